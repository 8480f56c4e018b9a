//! Vertex stream layouts.
//!
//! Geometry is uploaded as one buffer per attribute stream (positions,
//! normals, per-vertex colors), mirroring the way model data arrives as
//! separate flat sequences. A pipeline declares which streams it consumes
//! via [`VertexStreams`].

use std::mem;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 0,
    format: wgpu::VertexFormat::Float32x3,
}];

const NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 1,
    format: wgpu::VertexFormat::Float32x3,
}];

const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 2,
    format: wgpu::VertexFormat::Float32x4,
}];

/// Vertex position stream: three floats per vertex at shader location 0.
pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRIBUTES,
    }
}

/// Vertex normal stream: three floats per vertex at shader location 1.
pub fn normal_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &NORMAL_ATTRIBUTES,
    }
}

/// Per-vertex color stream: four floats per vertex at shader location 2.
pub fn color_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &COLOR_ATTRIBUTES,
    }
}

/// The set of vertex streams a pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexStreams {
    /// Positions only (wireframe drawing).
    Position,
    /// Positions and normals (lit solids).
    PositionNormal,
    /// Positions, normals, and per-vertex colors.
    PositionNormalColor,
}

impl VertexStreams {
    pub fn layouts(&self) -> Vec<wgpu::VertexBufferLayout<'static>> {
        match self {
            VertexStreams::Position => vec![position_layout()],
            VertexStreams::PositionNormal => vec![position_layout(), normal_layout()],
            VertexStreams::PositionNormalColor => {
                vec![position_layout(), normal_layout(), color_layout()]
            }
        }
    }
}

//! Drawable scene entries and the external model format.
//!
//! [`ModelData`] is the serde shape of the on-disk JSON models. It passes
//! through one explicit normalization step ([`SceneObject::from_model`])
//! that fills material defaults, derives normals when the source omits
//! them, and merges typed overrides, producing a fully-populated entry.

use cgmath::{Matrix4, SquareMatrix, Vector3};
use serde::Deserialize;
use wgpu::util::DeviceExt;
use wgpu::Device;

use crate::gfx::rendering::ObjectBindingLayouts;
use crate::gfx::transforms::MatrixUniforms;
use crate::wgpu_utils::uniform_buffer::UniformBuffer;

/// External model record, as loaded from JSON.
///
/// Vertices are a flat sequence of three floats per vertex; indices are
/// unsigned 16-bit. Everything else is optional and defaulted during
/// normalization. Both the descriptive material names and the OBJ-style
/// short forms (`Ns`, `d`) are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelData {
    pub alias: Option<String>,
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
    pub normals: Option<Vec<f32>>,
    #[serde(alias = "textureCoords")]
    pub texture_coords: Option<Vec<f32>>,
    pub scalars: Option<Vec<f32>>,
    pub ambient: Option<[f32; 4]>,
    pub diffuse: Option<[f32; 4]>,
    pub specular: Option<[f32; 4]>,
    #[serde(alias = "Ns", alias = "specularExponent")]
    pub specular_exponent: Option<f32>,
    #[serde(alias = "d")]
    pub transparency: Option<f32>,
    pub wireframe: bool,
    pub hidden: bool,
}

/// Typed override set merged onto a model during [`SceneObject::from_model`].
#[derive(Debug, Clone, Default)]
pub struct ObjectOverrides {
    pub ambient: Option<[f32; 4]>,
    pub diffuse: Option<[f32; 4]>,
    pub specular: Option<[f32; 4]>,
    pub shininess: Option<f32>,
    pub opacity: Option<f32>,
    pub wireframe: Option<bool>,
    pub visible: Option<bool>,
}

/// Material block uploaded per object.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: f32,
    pub use_vertex_color: u32,
    pub _padding: [f32; 2],
}

/// GPU-side resources exclusively owned by one scene entry.
///
/// Streams absent from the source data get no buffer. The normal buffer is
/// skipped for wireframe entries, which draw unlit lines.
pub struct ObjectGpuResources {
    pub position_buffer: wgpu::Buffer,
    pub normal_buffer: Option<wgpu::Buffer>,
    pub color_buffer: Option<wgpu::Buffer>,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub matrices_ubo: UniformBuffer<MatrixUniforms>,
    pub matrices_bind_group: wgpu::BindGroup,
    pub material_ubo: UniformBuffer<MaterialUniform>,
    pub material_bind_group: wgpu::BindGroup,
}

impl ObjectGpuResources {
    /// Explicitly releases every buffer owned by this entry.
    pub fn release(&self) {
        self.position_buffer.destroy();
        if let Some(buffer) = &self.normal_buffer {
            buffer.destroy();
        }
        if let Some(buffer) = &self.color_buffer {
            buffer.destroy();
        }
        self.index_buffer.destroy();
    }
}

/// A drawable entry in the scene registry.
pub struct SceneObject {
    pub alias: String,
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
    pub normals: Vec<f32>,
    pub texture_coords: Option<Vec<f32>>,
    pub scalars: Option<Vec<f32>>,

    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: f32,
    pub opacity: f32,

    pub wireframe: bool,
    pub visible: bool,

    /// Model transform composed onto the model-view inside the per-object
    /// push/pop window each frame.
    pub transform: Matrix4<f32>,

    pub(crate) gpu: Option<ObjectGpuResources>,
}

impl SceneObject {
    /// Normalizes a model record into a fully-populated entry.
    ///
    /// Material colors default to the conventional opaque values, the
    /// shininess exponent to 0, and opacity to 1. Normals are derived from
    /// vertices and indices when the source does not supply a matching set;
    /// wireframe entries carry no normals at all.
    pub fn from_model(model: ModelData, overrides: Option<ObjectOverrides>) -> Self {
        let ModelData {
            alias,
            vertices,
            indices,
            normals,
            texture_coords,
            scalars,
            ambient,
            diffuse,
            specular,
            specular_exponent,
            transparency,
            wireframe,
            hidden,
        } = model;

        let normals = if wireframe {
            Vec::new()
        } else {
            match normals {
                Some(supplied) if supplied.len() == vertices.len() => supplied,
                _ => calculate_normals(&vertices, &indices),
            }
        };

        let mut object = Self {
            alias: alias.unwrap_or_default(),
            vertices,
            indices,
            normals,
            texture_coords,
            scalars,
            ambient: ambient.unwrap_or([0.2, 0.2, 0.2, 1.0]),
            diffuse: diffuse.unwrap_or([1.0, 1.0, 1.0, 1.0]),
            specular: specular.unwrap_or([1.0, 1.0, 1.0, 1.0]),
            shininess: specular_exponent.unwrap_or(0.0),
            opacity: transparency.unwrap_or(1.0),
            wireframe,
            visible: !hidden,
            transform: Matrix4::identity(),
            gpu: None,
        };

        if let Some(overrides) = overrides {
            object.apply_overrides(overrides);
        }

        object
    }

    fn apply_overrides(&mut self, overrides: ObjectOverrides) {
        if let Some(ambient) = overrides.ambient {
            self.ambient = ambient;
        }
        if let Some(diffuse) = overrides.diffuse {
            self.diffuse = diffuse;
        }
        if let Some(specular) = overrides.specular {
            self.specular = specular;
        }
        if let Some(shininess) = overrides.shininess {
            self.shininess = shininess;
        }
        if let Some(opacity) = overrides.opacity {
            self.opacity = opacity;
        }
        if let Some(wireframe) = overrides.wireframe {
            self.wireframe = wireframe;
        }
        if let Some(visible) = overrides.visible {
            self.visible = visible;
        }
    }

    /// Sets the model transform to a plain translation.
    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.transform = Matrix4::from_translation(translation);
    }

    /// Resets the model transform to identity.
    pub fn reset_transform(&mut self) {
        self.transform = Matrix4::identity();
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu.is_some()
    }

    pub(crate) fn gpu_resources(&self) -> Option<&ObjectGpuResources> {
        self.gpu.as_ref()
    }

    fn material_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            ambient: self.ambient,
            diffuse: [
                self.diffuse[0],
                self.diffuse[1],
                self.diffuse[2],
                self.diffuse[3] * self.opacity,
            ],
            specular: self.specular,
            shininess: self.shininess,
            use_vertex_color: self.scalars.is_some() as u32,
            _padding: [0.0; 2],
        }
    }

    /// Uploads vertex/index data and allocates the uniform buffers and bind
    /// groups for this entry. Called once per entry; later frames only
    /// rewrite uniform contents.
    pub(crate) fn init_gpu_resources(&mut self, device: &Device, layouts: &ObjectBindingLayouts) {
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} positions", self.alias)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let normal_buffer = if self.normals.is_empty() {
            None
        } else {
            Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} normals", self.alias)),
                contents: bytemuck::cast_slice(&self.normals),
                usage: wgpu::BufferUsages::VERTEX,
            }))
        };

        let color_buffer = self.scalars.as_ref().map(|scalars| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} colors", self.alias)),
                contents: bytemuck::cast_slice(scalars),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} indices", self.alias)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let matrices_ubo = UniformBuffer::new_with_data(device, &MatrixUniforms::default());
        let matrices_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} matrices", self.alias)),
            layout: &layouts.matrices,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: matrices_ubo.binding_resource(),
            }],
        });

        let material_ubo = UniformBuffer::new_with_data(device, &self.material_uniform());
        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} material", self.alias)),
            layout: &layouts.material,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_ubo.binding_resource(),
            }],
        });

        self.gpu = Some(ObjectGpuResources {
            position_buffer,
            normal_buffer,
            color_buffer,
            index_count: self.indices.len() as u32,
            index_buffer,
            matrices_ubo,
            matrices_bind_group,
            material_ubo,
            material_bind_group,
        });
    }

    /// Writes this frame's committed matrices and the current material
    /// values into the entry's uniform buffers.
    pub(crate) fn write_frame_uniforms(&mut self, queue: &wgpu::Queue, matrices: MatrixUniforms) {
        let material = self.material_uniform();
        if let Some(gpu) = &mut self.gpu {
            gpu.matrices_ubo.update_content(queue, matrices);
            gpu.material_ubo.update_content(queue, material);
        }
    }
}

/// Per-vertex normals averaged from triangle face normals.
///
/// A zero-length accumulated normal is given unit length before the final
/// normalize, so degenerate geometry cannot divide by zero.
pub fn calculate_normals(vertices: &[f32], indices: &[u16]) -> Vec<f32> {
    let mut normals = vec![0.0f32; vertices.len()];

    for triangle in indices.chunks_exact(3) {
        let i0 = triangle[0] as usize * 3;
        let i1 = triangle[1] as usize * 3;
        let i2 = triangle[2] as usize * 3;

        // Two triangle edges sharing the middle vertex.
        let v1 = [
            vertices[i2] - vertices[i1],
            vertices[i2 + 1] - vertices[i1 + 1],
            vertices[i2 + 2] - vertices[i1 + 2],
        ];
        let v2 = [
            vertices[i0] - vertices[i1],
            vertices[i0 + 1] - vertices[i1 + 1],
            vertices[i0 + 2] - vertices[i1 + 2],
        ];

        let face_normal = [
            v1[1] * v2[2] - v1[2] * v2[1],
            v1[2] * v2[0] - v1[0] * v2[2],
            v1[0] * v2[1] - v1[1] * v2[0],
        ];

        for &base in &[i0, i1, i2] {
            normals[base] += face_normal[0];
            normals[base + 1] += face_normal[1];
            normals[base + 2] += face_normal[2];
        }
    }

    for normal in normals.chunks_exact_mut(3) {
        let mut length =
            (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        if length == 0.0 {
            length = 1.0;
        }

        normal[0] /= length;
        normal[1] /= length;
        normal[2] /= length;
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccw_triangle_normal_points_along_positive_z() {
        let vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = vec![0, 1, 2];

        let normals = calculate_normals(&vertices, &indices);

        for chunk in normals.chunks_exact(3) {
            assert!((chunk[0]).abs() < 1e-6);
            assert!((chunk[1]).abs() < 1e-6);
            assert!((chunk[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn degenerate_triangle_produces_finite_normals() {
        // All three corners coincide; the face normal has zero length.
        let vertices = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let indices = vec![0, 1, 2];

        let normals = calculate_normals(&vertices, &indices);

        assert!(normals.iter().all(|n| n.is_finite()));
        assert!(normals.iter().all(|n| *n == 0.0));
    }

    #[test]
    fn normalization_fills_material_defaults() {
        let model = ModelData {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            ..Default::default()
        };

        let object = SceneObject::from_model(model, None);

        assert_eq!(object.diffuse, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(object.ambient, [0.2, 0.2, 0.2, 1.0]);
        assert_eq!(object.specular, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(object.shininess, 0.0);
        assert_eq!(object.opacity, 1.0);
        assert!(object.visible);
        assert!(!object.wireframe);
        assert_eq!(object.normals.len(), object.vertices.len());
    }

    #[test]
    fn overrides_win_over_model_values() {
        let model = ModelData {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            diffuse: Some([0.5, 0.5, 0.5, 1.0]),
            ..Default::default()
        };
        let overrides = ObjectOverrides {
            diffuse: Some([1.0, 0.0, 0.0, 1.0]),
            opacity: Some(0.5),
            ..Default::default()
        };

        let object = SceneObject::from_model(model, Some(overrides));

        assert_eq!(object.diffuse, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(object.opacity, 0.5);
    }

    #[test]
    fn supplied_normals_are_kept_when_lengths_match() {
        let model = ModelData {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            normals: Some(vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]),
            ..Default::default()
        };

        let object = SceneObject::from_model(model, None);

        assert_eq!(object.normals[1], 1.0);
        assert_eq!(object.normals[2], 0.0);
    }

    #[test]
    fn wireframe_entries_skip_normal_derivation() {
        let model = ModelData {
            vertices: vec![-1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            indices: vec![0, 1],
            wireframe: true,
            ..Default::default()
        };

        let object = SceneObject::from_model(model, None);

        assert!(object.normals.is_empty());
    }

    #[test]
    fn opacity_folds_into_material_diffuse_alpha() {
        let model = ModelData {
            vertices: vec![0.0; 9],
            indices: vec![0, 1, 2],
            diffuse: Some([1.0, 1.0, 1.0, 1.0]),
            transparency: Some(0.25),
            ..Default::default()
        };

        let object = SceneObject::from_model(model, None);

        assert_eq!(object.material_uniform().diffuse[3], 0.25);
    }
}

//! # Graphics Module
//!
//! Everything graphics-side of the engine: the dual-mode camera, the
//! ordered scene registry, the per-frame transform stack, procedural
//! geometry, and the wgpu rendering backend.
//!
//! ## Architecture Overview
//!
//! - **Camera** ([`camera`]) - orbiting/tracking viewpoint with an
//!   always-rebuilt orientation matrix
//! - **Scene** ([`scene`]) - ordered registry of drawable entries with
//!   render-priority operations
//! - **Transforms** ([`transforms`]) - model-view/projection/normal
//!   matrices with scoped push/pop
//! - **Geometry** ([`geometry`]) - procedural floor/axis/cone/sphere
//! - **Rendering** ([`rendering`]) - wgpu surface, pipelines, and the
//!   per-frame draw traversal

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod scene;
pub mod transforms;

// Re-export commonly used types
pub use camera::{Camera, CameraMode};
pub use rendering::RenderEngine;
pub use scene::Scene;
pub use transforms::Transforms;

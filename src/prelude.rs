//! Convenience re-exports for demo programs.

pub use crate::app::{NeepApp, UiFrame};
pub use crate::gfx::camera::{Camera, CameraController, CameraMode};
pub use crate::gfx::geometry::{generate_axis, generate_cone, generate_floor, generate_sphere};
pub use crate::gfx::scene::{ModelData, ObjectOverrides, Scene, SceneObject};
pub use crate::gfx::transforms::{ProjectionKind, Transforms};
pub use crate::ui::{camera_panel, scene_panel};

pub use cgmath::{Deg, Matrix4, Vector3};

pub mod camera;
pub mod camera_controller;

// Re-export main types
pub use camera::{Camera, CameraMode};
pub use camera_controller::CameraController;

//! Debug UI: imgui integration and built-in panels.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{camera_panel, scene_panel};

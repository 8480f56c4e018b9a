// src/lib.rs
//! Neep
//!
//! A small interactive 3D engine: a scene registry, a dual-mode camera,
//! and a hierarchical transform stack, rendered through wgpu and driven by
//! a winit frame loop with imgui debug controls.

pub mod app;
pub mod gfx;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::NeepApp;

/// Creates a default application instance
pub fn default() -> NeepApp {
    NeepApp::new()
}

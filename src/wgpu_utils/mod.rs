//! Small wgpu helpers shared across the engine.

pub mod uniform_buffer;

pub use uniform_buffer::UniformBuffer;

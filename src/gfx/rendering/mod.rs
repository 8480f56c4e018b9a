pub mod pipeline_manager;
pub mod render_engine;
pub mod vertex;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{LightConfig, ObjectBindingLayouts, RenderEngine};
pub use vertex::VertexStreams;

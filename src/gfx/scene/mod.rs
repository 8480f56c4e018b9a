pub mod object;
pub mod scene;

// Re-export main types
pub use object::{calculate_normals, ModelData, ObjectOverrides, SceneObject};
pub use scene::{LoadError, Scene};

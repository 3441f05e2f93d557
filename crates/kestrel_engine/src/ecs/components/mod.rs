//! Built-in components

pub mod mesh_renderer;
pub mod physics_body;

pub use mesh_renderer::{MeshRenderer, MODEL_PARAMETER};
pub use physics_body::PhysicsBody;

//! # Rendering collaborators
//!
//! The engine core talks to the GPU and the OS window only through the narrow
//! contracts defined here:
//! - **`backend`**: [`GraphicsBackend`] (compile/bind shaders, named parameters,
//!   mesh upload and draw) and the [`RecordingBackend`] used without a GPU
//! - **`window`**: [`WindowBackend`] with headless and GLFW implementations
//! - **`mesh`**, **`camera`**: geometry and view/projection values consumed by
//!   the built-in render subsystem

pub mod backend;
pub mod camera;
pub mod mesh;
pub mod window;

pub use backend::{
    DrawCommand, GraphicsBackend, GraphicsError, MeshId, RecordingBackend, ShaderId, ShaderParam,
    ShaderSource,
};
pub use camera::Camera;
pub use mesh::{Mesh, MeshError, Vertex};
pub use window::{HeadlessWindow, WindowBackend, WindowError};
#[cfg(feature = "glfw")]
pub use window::GlfwWindow;

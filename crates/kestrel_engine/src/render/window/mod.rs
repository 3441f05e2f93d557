//! Window backends
//!
//! - **`backend`**: the [`WindowBackend`] contract used by the main loop
//! - **`headless`**: scripted window for tests and batch runs
//! - **`glfw`**: desktop window, behind the `glfw` feature

pub mod backend;
pub mod headless;
#[cfg(feature = "glfw")]
pub mod glfw;

pub use backend::{WindowBackend, WindowError};
pub use headless::HeadlessWindow;
#[cfg(feature = "glfw")]
pub use self::glfw::GlfwWindow;

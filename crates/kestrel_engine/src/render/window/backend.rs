//! Window backend contract
//!
//! A window backend owns the OS surface: it reports whether the window is open
//! and focused, presents finished frames (pumping OS events as a side effect)
//! and hands out input snapshots through [`InputSource`].

use std::time::Duration;

use thiserror::Error;

use crate::input::InputSource;

/// Window management errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// Windowing library failed to start
    #[error("window system initialization failed: {0}")]
    InitializationFailed(String),

    /// OS refused to create the window
    #[error("window creation failed")]
    CreationFailed,

    /// A window is already open in this process
    #[error("a window is already open")]
    AlreadyOpen,
}

/// Operations the main loop needs from the OS window
pub trait WindowBackend: InputSource {
    /// False once the user or the application has closed the window
    fn is_open(&self) -> bool;

    /// True while the window has input focus
    fn is_focused(&self) -> bool;

    /// Client area size in pixels
    fn size(&self) -> (u32, u32);

    /// Show the finished frame and pump pending window events
    fn present_frame(&mut self);

    /// Request the window to close; `is_open` reports false afterwards
    fn close(&mut self);

    /// Block the calling thread
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// Access the concrete type for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Mutable access to the concrete type for downcasting
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

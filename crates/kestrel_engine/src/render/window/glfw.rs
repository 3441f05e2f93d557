//! GLFW-backed desktop window
//!
//! Creates an OpenGL-capable window with vsync pacing. Only one window may be
//! open per process at a time.

use std::sync::atomic::{AtomicBool, Ordering};

use glfw::Context;

use crate::input::{InputSource, KeyCode, KeyboardState, MouseButtons, MouseState};
use super::backend::{WindowBackend, WindowError};

static WINDOW_OPEN: AtomicBool = AtomicBool::new(false);

const KEY_MAP: [(glfw::Key, KeyCode); 14] = [
    (glfw::Key::A, KeyCode::A),
    (glfw::Key::D, KeyCode::D),
    (glfw::Key::E, KeyCode::E),
    (glfw::Key::Q, KeyCode::Q),
    (glfw::Key::R, KeyCode::R),
    (glfw::Key::S, KeyCode::S),
    (glfw::Key::W, KeyCode::W),
    (glfw::Key::Space, KeyCode::Space),
    (glfw::Key::Enter, KeyCode::Enter),
    (glfw::Key::Escape, KeyCode::Escape),
    (glfw::Key::Up, KeyCode::Up),
    (glfw::Key::Down, KeyCode::Down),
    (glfw::Key::Left, KeyCode::Left),
    (glfw::Key::Right, KeyCode::Right),
];

/// Desktop window driven by GLFW
pub struct GlfwWindow {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl GlfwWindow {
    /// Open a window with the given title and client size
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, WindowError> {
        if WINDOW_OPEN
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WindowError::AlreadyOpen);
        }

        match Self::open(title, width, height) {
            Ok(window) => Ok(window),
            Err(err) => {
                WINDOW_OPEN.store(false, Ordering::Release);
                Err(err)
            }
        }
    }

    fn open(title: &str, width: u32, height: u32) -> Result<Self, WindowError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|err| WindowError::InitializationFailed(format!("{:?}", err)))?;

        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        window.make_current();
        glfw.set_swap_interval(glfw::SwapInterval::Sync(1));
        window.set_close_polling(true);
        window.set_focus_polling(true);

        log::info!("Opened {}x{} window '{}'", width, height, title);
        Ok(Self { glfw, window, events })
    }
}

impl Drop for GlfwWindow {
    fn drop(&mut self) {
        WINDOW_OPEN.store(false, Ordering::Release);
    }
}

impl InputSource for GlfwWindow {
    fn poll_keyboard(&mut self) -> KeyboardState {
        let mut keyboard = KeyboardState::default();
        for (key, code) in KEY_MAP {
            keyboard.set(code, self.window.get_key(key) != glfw::Action::Release);
        }
        keyboard
    }

    fn poll_mouse(&mut self) -> MouseState {
        let (screen_x, screen_y) = self.window.get_cursor_pos();
        let mut buttons = MouseButtons::empty();
        for (button, flag) in [
            (glfw::MouseButton::Button1, MouseButtons::LEFT),
            (glfw::MouseButton::Button2, MouseButtons::RIGHT),
            (glfw::MouseButton::Button3, MouseButtons::MIDDLE),
        ] {
            if self.window.get_mouse_button(button) != glfw::Action::Release {
                buttons |= flag;
            }
        }
        MouseState { screen_x, screen_y, buttons }
    }
}

impl WindowBackend for GlfwWindow {
    fn is_open(&self) -> bool {
        !self.window.should_close()
    }

    fn is_focused(&self) -> bool {
        self.window.is_focused()
    }

    fn size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    fn present_frame(&mut self) {
        self.window.swap_buffers();
        self.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&self.events) {
            if let glfw::WindowEvent::Focus(focused) = event {
                log::debug!("Window focus changed: {}", focused);
            }
        }
    }

    fn close(&mut self) {
        self.window.set_should_close(true);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

//! Input state tracking
//!
//! The window backend is polled once per frame through [`InputSource`]; the
//! resulting snapshots are cached in [`InputState`], which also keeps the
//! previous frame's snapshot for edge detection.

use std::collections::HashSet;

use bitflags::bitflags;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum KeyCode {
    A, D, E, Q, R, S, W,
    Space,
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

bitflags! {
    /// Set of mouse buttons held down
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MouseButtons: u8 {
        /// Left mouse button
        const LEFT = 1 << 0;
        /// Right mouse button
        const RIGHT = 1 << 1;
        /// Middle mouse button
        const MIDDLE = 1 << 2;
    }
}

impl Default for MouseButtons {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
        }
    }
}

/// Snapshot of which keys are held down
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Snapshot with the given keys held
    pub fn with_pressed(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self {
            pressed: keys.into_iter().collect(),
        }
    }

    /// Mark a key as held or released
    pub fn set(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    /// True if `key` is held in this snapshot
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Iterate over held keys in no particular order
    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.pressed.iter().copied()
    }
}

/// Snapshot of the cursor and mouse buttons
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    /// Cursor X position in window pixels from the left edge
    pub screen_x: f64,
    /// Cursor Y position in window pixels from the top edge
    pub screen_y: f64,
    /// Buttons held down
    pub buttons: MouseButtons,
}

impl MouseState {
    /// True if `button` is held in this snapshot
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(button.into())
    }

    /// Convert the cursor position to normalized device coordinates
    ///
    /// X runs -1 (left) to +1 (right), Y runs -1 (top) to +1 (bottom).
    pub fn screen_to_ndc(&self, window_width: u32, window_height: u32) -> (f32, f32) {
        let ndc_x = (self.screen_x / f64::from(window_width.max(1))) as f32 * 2.0 - 1.0;
        let ndc_y = (self.screen_y / f64::from(window_height.max(1))) as f32 * 2.0 - 1.0;
        (ndc_x, ndc_y)
    }
}

/// Anything that can report keyboard and mouse snapshots
pub trait InputSource {
    /// Current keyboard snapshot
    fn poll_keyboard(&mut self) -> KeyboardState;

    /// Current mouse snapshot
    fn poll_mouse(&mut self) -> MouseState;
}

/// Input cached by the game once per frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keyboard: KeyboardState,
    mouse: MouseState,
    previous_keyboard: KeyboardState,
    previous_mouse: MouseState,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll `source` and shift the current snapshot into the previous slot
    pub fn poll(&mut self, source: &mut dyn InputSource) {
        let keyboard = source.poll_keyboard();
        let mouse = source.poll_mouse();
        self.update(keyboard, mouse);
    }

    /// Replace the current snapshot
    pub fn update(&mut self, keyboard: KeyboardState, mouse: MouseState) {
        self.previous_keyboard = std::mem::replace(&mut self.keyboard, keyboard);
        self.previous_mouse = std::mem::replace(&mut self.mouse, mouse);
    }

    /// Latest keyboard snapshot
    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    /// Latest mouse snapshot
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// True if `key` is held this frame
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keyboard.is_key_pressed(key)
    }

    /// True if `key` went down this frame
    pub fn was_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keyboard.is_key_pressed(key) && !self.previous_keyboard.is_key_pressed(key)
    }

    /// True if `key` came up this frame
    pub fn was_key_just_released(&self, key: KeyCode) -> bool {
        !self.keyboard.is_key_pressed(key) && self.previous_keyboard.is_key_pressed(key)
    }

    /// True if `button` is held this frame
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse.is_pressed(button)
    }

    /// Cursor movement since the previous frame in pixels
    pub fn cursor_delta(&self) -> (f64, f64) {
        (
            self.mouse.screen_x - self.previous_mouse.screen_x,
            self.mouse.screen_y - self.previous_mouse.screen_y,
        )
    }
}

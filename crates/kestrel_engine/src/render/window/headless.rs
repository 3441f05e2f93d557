//! Window backend without an OS surface
//!
//! Runs the main loop for a fixed number of presented frames, optionally
//! losing focus for a scripted number of presents and replaying scripted input.
//! Sleeping is recorded instead of performed.

use std::collections::VecDeque;
use std::time::Duration;

use crate::input::{InputSource, KeyboardState, MouseState};
use super::backend::WindowBackend;

/// Scripted stand-in for an OS window
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    width: u32,
    height: u32,
    frame_budget: Option<u64>,
    presents: u64,
    open: bool,
    focus_loss: Option<(u64, u64)>,
    unfocused_remaining: u64,
    slept: Duration,
    keyboard: VecDeque<KeyboardState>,
    mouse: VecDeque<MouseState>,
    last_keyboard: KeyboardState,
    last_mouse: MouseState,
}

impl HeadlessWindow {
    /// Window that stays open until closed explicitly
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_budget: None,
            presents: 0,
            open: true,
            focus_loss: None,
            unfocused_remaining: 0,
            slept: Duration::ZERO,
            keyboard: VecDeque::new(),
            mouse: VecDeque::new(),
            last_keyboard: KeyboardState::default(),
            last_mouse: MouseState::default(),
        }
    }

    /// Close automatically after `frames` presents
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    /// Lose focus once `after_presents` frames are shown, for `presents` presents
    pub fn with_focus_loss(mut self, after_presents: u64, presents: u64) -> Self {
        self.focus_loss = Some((after_presents, presents));
        self
    }

    /// Queue one keyboard snapshot per poll; the last one repeats
    pub fn with_keyboard_script(mut self, frames: impl IntoIterator<Item = KeyboardState>) -> Self {
        self.keyboard.extend(frames);
        self
    }

    /// Queue one mouse snapshot per poll; the last one repeats
    pub fn with_mouse_script(mut self, frames: impl IntoIterator<Item = MouseState>) -> Self {
        self.mouse.extend(frames);
        self
    }

    /// Presents performed so far, including those made while unfocused
    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Total time the loop asked to sleep
    pub fn slept(&self) -> Duration {
        self.slept
    }
}

impl InputSource for HeadlessWindow {
    fn poll_keyboard(&mut self) -> KeyboardState {
        if let Some(next) = self.keyboard.pop_front() {
            self.last_keyboard = next;
        }
        self.last_keyboard.clone()
    }

    fn poll_mouse(&mut self) -> MouseState {
        if let Some(next) = self.mouse.pop_front() {
            self.last_mouse = next;
        }
        self.last_mouse
    }
}

impl WindowBackend for HeadlessWindow {
    fn is_open(&self) -> bool {
        self.open
    }

    fn is_focused(&self) -> bool {
        self.unfocused_remaining == 0
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present_frame(&mut self) {
        let was_unfocused = self.unfocused_remaining > 0;
        self.presents += 1;

        if was_unfocused {
            self.unfocused_remaining -= 1;
        } else if let Some((after, presents)) = self.focus_loss {
            if self.presents == after {
                self.unfocused_remaining = presents;
                self.focus_loss = None;
            }
        }

        if !was_unfocused {
            if let Some(budget) = self.frame_budget {
                self.frame_budget = Some(budget.saturating_sub(1));
                if budget <= 1 {
                    self.open = false;
                }
            }
        }
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn sleep(&mut self, duration: Duration) {
        self.slept += duration;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn test_frame_budget_closes_window() {
        let mut window = HeadlessWindow::new(640, 480).with_frame_budget(2);
        assert!(window.is_open());
        window.present_frame();
        assert!(window.is_open());
        window.present_frame();
        assert!(!window.is_open());
        assert_eq!(window.size(), (640, 480));
    }

    #[test]
    fn test_unfocused_presents_do_not_spend_budget() {
        let mut window = HeadlessWindow::new(1, 1)
            .with_frame_budget(3)
            .with_focus_loss(1, 2);

        window.present_frame();
        assert!(!window.is_focused());
        window.present_frame();
        assert!(!window.is_focused());
        window.present_frame();
        assert!(window.is_focused());
        assert!(window.is_open());

        window.present_frame();
        window.present_frame();
        assert!(!window.is_open());
        assert_eq!(window.presents(), 5);
    }

    #[test]
    fn test_keyboard_script_repeats_last_snapshot() {
        let mut window = HeadlessWindow::new(1, 1).with_keyboard_script([
            KeyboardState::default(),
            KeyboardState::with_pressed([KeyCode::Space]),
        ]);

        assert!(!window.poll_keyboard().is_key_pressed(KeyCode::Space));
        assert!(window.poll_keyboard().is_key_pressed(KeyCode::Space));
        assert!(window.poll_keyboard().is_key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_sleep_is_recorded() {
        let mut window = HeadlessWindow::new(1, 1);
        window.sleep(Duration::from_millis(10));
        window.sleep(Duration::from_millis(5));
        assert_eq!(window.slept(), Duration::from_millis(15));
    }
}

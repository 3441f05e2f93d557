//! Time management utilities

use std::time::Instant;

use thiserror::Error;

/// Errors reported by [`FixedTimestep`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    /// Step length must be finite and greater than zero
    #[error("invalid time step {0}: must be a positive number of seconds")]
    InvalidStep(f32),
}

/// High-precision timer for variable frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
        }
    }

    /// Advance the timer and return the seconds elapsed since the previous tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.delta_time
    }

    /// Restart delta measurement from now without counting a frame
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.delta_time = 0.0;
    }

    /// Get the time between the two most recent ticks in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }
}

/// Fixed-step accumulator decoupling simulation rate from frame rate
///
/// Variable frame deltas go in through [`advance`](Self::advance); whole steps
/// come out and the remainder carries over to the next frame.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// Create an accumulator with the given step length and per-frame step cap
    pub fn new(step: f32, max_steps: u32) -> Result<Self, TimeError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(TimeError::InvalidStep(step));
        }

        Ok(Self {
            step,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        })
    }

    /// Step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time carried over from previous frames
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }

    /// Add `dt` seconds and return how many whole steps are due
    ///
    /// When more than `max_steps` steps are due the surplus is discarded so a
    /// long stall cannot snowball into ever longer frames.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step {
            if steps == self.max_steps {
                log::warn!(
                    "Fixed step fell behind by {:.4}s, dropping surplus time",
                    self.accumulator
                );
                self.accumulator %= self.step;
                break;
            }
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Drop any carried-over time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_step_carries_remainder() {
        let mut stepper = FixedTimestep::new(0.1, 8).unwrap();

        assert_eq!(stepper.advance(0.25), 2);
        assert_relative_eq!(stepper.accumulated(), 0.05, epsilon = 1e-6);

        assert_eq!(stepper.advance(0.06), 1);
        assert_relative_eq!(stepper.accumulated(), 0.01, epsilon = 1e-6);
        assert_relative_eq!(stepper.alpha(), 0.1, epsilon = 1e-4);
    }

    #[test]
    fn test_fixed_step_single_frame_equals_step() {
        let step = 1.0 / 60.0;
        let mut stepper = FixedTimestep::new(step, 8).unwrap();
        assert_eq!(stepper.advance(step), 1);
        assert_eq!(stepper.advance(step * 0.5), 0);
        assert_eq!(stepper.advance(step * 0.5), 1);
    }

    #[test]
    fn test_fixed_step_caps_catch_up() {
        let mut stepper = FixedTimestep::new(0.1, 3).unwrap();
        assert_eq!(stepper.advance(1.05), 3);
        assert!(stepper.accumulated() < 0.1);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut stepper = FixedTimestep::new(0.1, 3).unwrap();
        assert_eq!(stepper.advance(-5.0), 0);
        assert_relative_eq!(stepper.accumulated(), 0.0);
    }

    #[test]
    fn test_degenerate_step_rejected() {
        for step in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            assert!(matches!(FixedTimestep::new(step, 8), Err(TimeError::InvalidStep(_))));
        }
    }

    #[test]
    fn test_timer_reset_restarts_delta() {
        let mut timer = Timer::new();
        assert!(timer.tick() >= 0.0);
        timer.reset();
        assert_relative_eq!(timer.delta_time(), 0.0);
    }
}

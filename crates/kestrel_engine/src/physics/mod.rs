//! Physics module: point-mass bodies and fixed-step Euler integration
//!
//! The [`PhysicsWorld`] owns its bodies in a generation-checked arena. Stepping
//! is deterministic for a given insertion order and step length; the fixed-step
//! scheduling itself lives in the physics subsystem
//! ([`crate::ecs::subsystems::PhysicsSubsystem`]).

pub mod body;
pub mod world;

pub use body::{Body, BodyKind};
pub use world::{BodyHandle, PhysicsWorld, WorldBounds};

use thiserror::Error;

use crate::foundation::time::TimeError;

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Dynamic bodies need a finite, positive mass
    #[error("invalid body mass {0}: must be finite and greater than zero")]
    InvalidMass(f32),

    /// Handle does not refer to a body in this world
    #[error("body handle does not refer to a live body")]
    UnknownBody,

    /// Step scheduling rejected its configuration
    #[error(transparent)]
    Timestep(#[from] TimeError),
}

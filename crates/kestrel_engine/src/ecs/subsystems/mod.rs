//! Built-in subsystems

pub mod physics;
pub mod render;

pub use physics::PhysicsSubsystem;
pub use render::{RenderSubsystem, PROJECTION_PARAMETER, VIEW_PARAMETER};

//! # Kestrel Engine
//!
//! A minimal real-time game engine core: entities composed from components,
//! subsystems updated in a fixed order each frame, fixed-step point-mass
//! physics decoupled from the variable frame rate, and a narrow contract over
//! the window and graphics API.
//!
//! ## Features
//!
//! - **Entity-Component-Subsystem runtime**: components are claimed by the
//!   subsystem of their kind; subsystems run before hook, member updates and
//!   after hook in registration order
//! - **Fixed-step physics**: explicit Euler integration drained from the frame
//!   delta in whole steps
//! - **Backend contracts**: headless window and recording graphics backend for
//!   tests, GLFW window behind the `glfw` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kestrel_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let config = EngineConfig::default();
//!     let window = HeadlessWindow::new(config.window.width, config.window.height).with_frame_budget(600);
//!     let mut game = Game::new(config, Box::new(window), Box::new(RecordingBackend::new()))?;
//!
//!     let physics = PhysicsSubsystem::new(&game.config().physics)?;
//!     game.add_subsystem(physics.into_subsystem()?)?;
//!     let render = RenderSubsystem::new(game.graphics_mut(), Camera::default())?;
//!     game.add_subsystem(render.into_subsystem()?)?;
//!
//!     let ball = game.create_entity();
//!     game.spawn_component(ball, PhysicsBody::component(Body::new(1.0)?))?;
//!     game.add_entity(ball)?;
//!
//!     game.run()?;
//!     game.shutdown()
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod engine;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;

pub use engine::{EngineError, Game, GameState};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, EngineConfig},
        ecs::{
            components::{MeshRenderer, PhysicsBody},
            subsystems::{PhysicsSubsystem, RenderSubsystem},
            Component, ComponentBehavior, ComponentId, EntityId, FrameContext, Subsystem,
            SubsystemHooks, SubsystemKind,
        },
        engine::{EngineError, Game, GameState},
        foundation::{
            math::{Mat4, Transform, Vec3},
            time::{FixedTimestep, Timer},
        },
        input::{KeyCode, MouseButton},
        physics::{Body, WorldBounds},
        render::{Camera, GraphicsBackend, HeadlessWindow, Mesh, RecordingBackend, Vertex, WindowBackend},
    };
}

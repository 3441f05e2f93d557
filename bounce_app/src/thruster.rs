//! Player-controlled thruster

use std::any::Any;

use kestrel_engine::ecs::{EcsError, FrameContext};
use kestrel_engine::input::KeyCode;
use kestrel_engine::prelude::*;

/// Subsystem kind for thrusters; registered before physics so thrust lands in
/// the same frame's integration
pub const THRUSTERS: SubsystemKind = SubsystemKind::Named("thrusters");

/// Pushes the entity's body while Space is held
#[derive(Debug, Clone)]
pub struct Thruster {
    force: Vec3,
    burn_time: f32,
}

impl Thruster {
    /// Thruster producing `force` newtons
    pub fn component(force: Vec3) -> Component {
        Component::with_behavior(THRUSTERS, Self { force, burn_time: 0.0 })
    }

    /// Seconds spent firing so far
    pub fn burn_time(&self) -> f32 {
        self.burn_time
    }
}

impl ComponentBehavior for Thruster {
    fn update(&mut self, ctx: &mut FrameContext<'_>, id: ComponentId, dt: f32) -> Result<(), EngineError> {
        if ctx.input.was_key_just_pressed(KeyCode::Space) {
            log::debug!("Thruster {:?} ignited", id);
        }
        if !ctx.input.is_key_pressed(KeyCode::Space) {
            return Ok(());
        }

        let entity = ctx
            .registry
            .component(id)
            .and_then(Component::entity)
            .ok_or(EcsError::UnknownComponent(id))?;
        PhysicsSubsystem::apply_force_to(ctx.registry, entity, self.force)?;
        self.burn_time += dt;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//! Physics subsystem: owns the world and drives fixed-step integration

use std::any::Any;

use crate::config::PhysicsConfig;
use crate::ecs::components::PhysicsBody;
use crate::ecs::registry::FrameContext;
use crate::ecs::{ComponentId, EcsError, EntityId, Registry, Subsystem, SubsystemHooks, SubsystemKind};
use crate::engine::EngineError;
use crate::foundation::collections::ArrayError;
use crate::foundation::math::Vec3;
use crate::foundation::time::{FixedTimestep, TimeError};
use crate::physics::{Body, PhysicsError, PhysicsWorld, WorldBounds};

/// Hooks for the [`SubsystemKind::Physics`] subsystem
///
/// Bodies enter the world when their component is claimed and leave it when
/// the component is destroyed. Integration runs in the after-frame hook, in
/// whole fixed steps drained from the accumulated frame time.
#[derive(Debug)]
pub struct PhysicsSubsystem {
    world: PhysicsWorld,
    timestep: FixedTimestep,
}

impl PhysicsSubsystem {
    /// Subsystem stepping at the configured rate
    ///
    /// Fails if `time_step` is not a positive number of seconds.
    pub fn new(config: &PhysicsConfig) -> Result<Self, PhysicsError> {
        Ok(Self {
            world: PhysicsWorld::new(),
            timestep: FixedTimestep::new(config.time_step, config.max_steps_per_frame)?,
        })
    }

    /// Keep dynamic bodies inside `bounds`
    pub fn with_bounds(mut self, bounds: WorldBounds) -> Self {
        self.world.set_bounds(Some(bounds));
        self
    }

    /// Wrap into a registrable subsystem
    pub fn into_subsystem(self) -> Result<Subsystem, ArrayError> {
        Subsystem::with_hooks(SubsystemKind::Physics, self)
    }

    /// The simulated world
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// The simulated world, mutably
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Step scheduling state
    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    /// Body of `entity`'s physics component
    pub fn body_of(registry: &Registry, entity: EntityId) -> Result<&Body, EngineError> {
        let handle = registry
            .sibling::<PhysicsBody>(entity, SubsystemKind::Physics)?
            .handle()
            .ok_or(EcsError::MissingSibling { entity, kind: SubsystemKind::Physics })?;
        let physics = registry
            .subsystem_hooks::<Self>(SubsystemKind::Physics)
            .ok_or(EcsError::MissingSubsystem(SubsystemKind::Physics))?;
        Ok(physics.world.body(handle).ok_or(PhysicsError::UnknownBody)?)
    }

    /// Accumulate `force` on `entity`'s body until the next step
    pub fn apply_force_to(registry: &mut Registry, entity: EntityId, force: Vec3) -> Result<(), EngineError> {
        let handle = registry
            .sibling::<PhysicsBody>(entity, SubsystemKind::Physics)?
            .handle()
            .ok_or(EcsError::MissingSibling { entity, kind: SubsystemKind::Physics })?;
        let physics = registry
            .subsystem_hooks_mut::<Self>(SubsystemKind::Physics)
            .ok_or(EcsError::MissingSubsystem(SubsystemKind::Physics))?;
        physics.world.apply_force(handle, force)?;
        Ok(())
    }
}

impl SubsystemHooks for PhysicsSubsystem {
    fn after_frame(&mut self, _ctx: &mut FrameContext<'_>, dt: f32) -> Result<(), EngineError> {
        let steps = self.timestep.advance(dt);
        for _ in 0..steps {
            self.world.step(self.timestep.step());
        }
        Ok(())
    }

    fn on_component_added(&mut self, ctx: &mut FrameContext<'_>, component: ComponentId) -> Result<(), EngineError> {
        let body = ctx
            .registry
            .behavior_mut::<PhysicsBody>(component)
            .ok_or(EcsError::UnexpectedBehavior { component, expected: "PhysicsBody" })?;
        let handle = body.link(&mut self.world).ok_or(EcsError::AlreadyClaimed(component))?;
        log::debug!("Linked component {:?} to body {:?}", component, handle);
        Ok(())
    }

    fn on_component_removed(&mut self, ctx: &mut FrameContext<'_>, component: ComponentId) -> Result<(), EngineError> {
        if let Some(body) = ctx.registry.behavior_mut::<PhysicsBody>(component) {
            body.unlink(&mut self.world);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//! Components: behavior units attached to exactly one entity

use std::any::Any;

use crate::engine::EngineError;
use super::registry::FrameContext;
use super::{ComponentId, EntityId, SubsystemKind};

/// Per-component behavior and data
///
/// Both callbacks default to doing nothing, so plain data components only
/// implement the downcasting accessors.
pub trait ComponentBehavior: Any {
    /// Called once per frame by the owning subsystem
    fn update(&mut self, ctx: &mut FrameContext<'_>, id: ComponentId, dt: f32) -> Result<(), EngineError> {
        let _ = (ctx, id, dt);
        Ok(())
    }

    /// Called once when the component is destroyed
    fn cleanup(&mut self, ctx: &mut FrameContext<'_>, id: ComponentId) -> Result<(), EngineError> {
        let _ = (ctx, id);
        Ok(())
    }

    /// Access the concrete type for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutable access to the concrete type for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Component record
///
/// The entity back-reference is set once by attachment and never reassigned.
pub struct Component {
    kind: SubsystemKind,
    entity: Option<EntityId>,
    claimed: bool,
    pub(crate) behavior: Option<Box<dyn ComponentBehavior>>,
}

impl Component {
    /// Component of `kind` with no behavior
    pub fn new(kind: SubsystemKind) -> Self {
        Self {
            kind,
            entity: None,
            claimed: false,
            behavior: None,
        }
    }

    /// Component of `kind` driven by `behavior`
    pub fn with_behavior(kind: SubsystemKind, behavior: impl ComponentBehavior) -> Self {
        Self {
            behavior: Some(Box::new(behavior)),
            ..Self::new(kind)
        }
    }

    /// Subsystem kind this component belongs to
    pub fn kind(&self) -> SubsystemKind {
        self.kind
    }

    /// Owning entity, once attached
    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    /// True once attached to an entity
    pub fn is_attached(&self) -> bool {
        self.entity.is_some()
    }

    /// True once claimed by its subsystem
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Behavior downcast to `T`
    ///
    /// `None` if there is no behavior, it is another type, or it is currently
    /// running its own callback.
    pub fn behavior<T: ComponentBehavior>(&self) -> Option<&T> {
        self.behavior.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Mutable behavior downcast to `T`
    pub fn behavior_mut<T: ComponentBehavior>(&mut self) -> Option<&mut T> {
        self.behavior.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    pub(crate) fn set_entity(&mut self, entity: Option<EntityId>) {
        self.entity = entity;
    }

    pub(crate) fn set_claimed(&mut self, claimed: bool) {
        self.claimed = claimed;
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("kind", &self.kind)
            .field("entity", &self.entity)
            .field("claimed", &self.claimed)
            .field("has_behavior", &self.behavior.is_some())
            .finish()
    }
}

//! Subsystems: update-order groups spanning components of one kind

use std::any::Any;

use slotmap::{Key, KeyData};

use crate::engine::EngineError;
use crate::foundation::collections::{ArrayError, DynArray};
use super::registry::FrameContext;
use super::{ComponentId, SubsystemKind};

/// Per-frame and membership hooks for a subsystem
///
/// Every hook defaults to a no-op. Hooks are lifted out of the registry while
/// they run, so a hook cannot reach its own subsystem through the context.
pub trait SubsystemHooks: Any {
    /// Runs once per frame before member components update
    fn before_frame(&mut self, ctx: &mut FrameContext<'_>, dt: f32) -> Result<(), EngineError> {
        let _ = (ctx, dt);
        Ok(())
    }

    /// Runs once per frame after member components update
    fn after_frame(&mut self, ctx: &mut FrameContext<'_>, dt: f32) -> Result<(), EngineError> {
        let _ = (ctx, dt);
        Ok(())
    }

    /// Runs when a component is claimed by this subsystem
    fn on_component_added(&mut self, ctx: &mut FrameContext<'_>, component: ComponentId) -> Result<(), EngineError> {
        let _ = (ctx, component);
        Ok(())
    }

    /// Runs when a claimed component is destroyed, before its own cleanup
    fn on_component_removed(&mut self, ctx: &mut FrameContext<'_>, component: ComponentId) -> Result<(), EngineError> {
        let _ = (ctx, component);
        Ok(())
    }

    /// Access the concrete type for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutable access to the concrete type for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Subsystem record
///
/// Members are references to components owned by their entities, kept as raw
/// slotmap keys in attachment order.
pub struct Subsystem {
    kind: SubsystemKind,
    members: DynArray,
    pub(crate) hooks: Option<Box<dyn SubsystemHooks>>,
}

impl Subsystem {
    /// Subsystem with no hooks
    pub fn new(kind: SubsystemKind) -> Result<Self, ArrayError> {
        Ok(Self {
            kind,
            members: DynArray::for_type::<u64>()?,
            hooks: None,
        })
    }

    /// Subsystem driven by `hooks`
    pub fn with_hooks(kind: SubsystemKind, hooks: impl SubsystemHooks) -> Result<Self, ArrayError> {
        let mut subsystem = Self::new(kind)?;
        subsystem.hooks = Some(Box::new(hooks));
        Ok(subsystem)
    }

    /// Identity of this subsystem
    pub fn kind(&self) -> SubsystemKind {
        self.kind
    }

    /// Number of claimed components
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when no component is claimed
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Claimed components in attachment order
    pub fn members(&self) -> Vec<ComponentId> {
        (0..self.members.len())
            .filter_map(|index| self.members.read_value::<u64>(index).ok())
            .map(|raw| ComponentId::from(KeyData::from_ffi(raw)))
            .collect()
    }

    /// True if `component` is a member
    pub fn contains(&self, component: ComponentId) -> bool {
        self.members.position_of(&component.data().as_ffi()).is_some()
    }

    /// Hooks downcast to `T`
    pub fn hooks<T: SubsystemHooks>(&self) -> Option<&T> {
        self.hooks.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Mutable hooks downcast to `T`
    pub fn hooks_mut<T: SubsystemHooks>(&mut self) -> Option<&mut T> {
        self.hooks.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    pub(crate) fn push_member(&mut self, component: ComponentId) -> Result<(), ArrayError> {
        self.members.push_value(&component.data().as_ffi())?;
        Ok(())
    }

    pub(crate) fn remove_member(&mut self, component: ComponentId) -> Result<bool, ArrayError> {
        match self.members.position_of(&component.data().as_ffi()) {
            Some(index) => {
                self.members.remove_at(index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subsystem")
            .field("kind", &self.kind)
            .field("members", &self.members.len())
            .field("has_hooks", &self.hooks.is_some())
            .finish()
    }
}

//! Registry of entities, components and subsystems, and the per-call context
//!
//! The registry is owned by the game. Lookups are public; structural changes
//! (attach, claim, destroy) go through [`crate::engine::Game`], which builds a
//! [`FrameContext`] so that subsystem hooks and component cleanup see the same
//! collaborators they see during a frame.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::engine::EngineError;
use crate::input::InputState;
use crate::render::GraphicsBackend;
use super::component::{Component, ComponentBehavior};
use super::entity::Entity;
use super::subsystem::{Subsystem, SubsystemHooks};
use super::{ComponentId, EcsError, EntityId, SubsystemId, SubsystemKind};

/// Storage for every entity, component and subsystem of one game
#[derive(Debug, Default)]
pub struct Registry {
    entities: SlotMap<EntityId, Entity>,
    components: SlotMap<ComponentId, Component>,
    subsystems: Vec<Subsystem>,
    index: HashMap<SubsystemKind, usize>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Ids of every live entity
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Look up a component
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Number of live components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// The component of `kind` attached to `entity`, if any
    pub fn get_component(&self, entity: EntityId, kind: SubsystemKind) -> Option<ComponentId> {
        self.entities.get(entity)?.components().iter().copied().find(|id| {
            self.components
                .get(*id)
                .is_some_and(|component| component.kind() == kind)
        })
    }

    /// Behavior of `component` downcast to `T`
    pub fn behavior<T: ComponentBehavior>(&self, component: ComponentId) -> Option<&T> {
        self.components.get(component)?.behavior::<T>()
    }

    /// Mutable behavior of `component` downcast to `T`
    pub fn behavior_mut<T: ComponentBehavior>(&mut self, component: ComponentId) -> Option<&mut T> {
        self.components.get_mut(component)?.behavior_mut::<T>()
    }

    /// Behavior `T` of the `kind` component on `entity`
    pub fn sibling<T: ComponentBehavior>(&self, entity: EntityId, kind: SubsystemKind) -> Result<&T, EcsError> {
        self.get_component(entity, kind)
            .and_then(|id| self.behavior::<T>(id))
            .ok_or(EcsError::MissingSibling { entity, kind })
    }

    /// Mutable behavior `T` of the `kind` component on `entity`
    pub fn sibling_mut<T: ComponentBehavior>(&mut self, entity: EntityId, kind: SubsystemKind) -> Result<&mut T, EcsError> {
        let id = self
            .get_component(entity, kind)
            .ok_or(EcsError::MissingSibling { entity, kind })?;
        self.behavior_mut::<T>(id)
            .ok_or(EcsError::MissingSibling { entity, kind })
    }

    /// Registered subsystem of `kind`
    pub fn subsystem(&self, kind: SubsystemKind) -> Option<&Subsystem> {
        self.index.get(&kind).and_then(|index| self.subsystems.get(*index))
    }

    /// Update-order position of the subsystem of `kind`
    pub fn subsystem_id(&self, kind: SubsystemKind) -> Option<SubsystemId> {
        self.index.get(&kind).copied().map(SubsystemId)
    }

    /// Subsystems in update order
    pub fn subsystems(&self) -> impl Iterator<Item = &Subsystem> + '_ {
        self.subsystems.iter()
    }

    /// Hooks of the `kind` subsystem downcast to `T`
    ///
    /// `None` while that subsystem's own hooks are running.
    pub fn subsystem_hooks<T: SubsystemHooks>(&self, kind: SubsystemKind) -> Option<&T> {
        self.subsystem(kind)?.hooks::<T>()
    }

    /// Mutable hooks of the `kind` subsystem downcast to `T`
    pub fn subsystem_hooks_mut<T: SubsystemHooks>(&mut self, kind: SubsystemKind) -> Option<&mut T> {
        let index = *self.index.get(&kind)?;
        self.subsystems.get_mut(index)?.hooks_mut::<T>()
    }

    pub(crate) fn add_subsystem(&mut self, subsystem: Subsystem) -> Result<SubsystemId, EcsError> {
        let kind = subsystem.kind();
        if self.index.contains_key(&kind) {
            return Err(EcsError::DuplicateSubsystem(kind));
        }

        let index = self.subsystems.len();
        self.subsystems.push(subsystem);
        self.index.insert(kind, index);
        log::info!("Registered {} subsystem at position {}", kind, index);
        Ok(SubsystemId(index))
    }

    pub(crate) fn subsystem_count(&self) -> usize {
        self.subsystems.len()
    }

    pub(crate) fn clear_subsystems(&mut self) {
        self.subsystems.clear();
        self.index.clear();
    }

    pub(crate) fn create_entity(&mut self) -> EntityId {
        self.entities.insert(Entity::new())
    }

    pub(crate) fn create_component(&mut self, component: Component) -> ComponentId {
        self.components.insert(component)
    }

    pub(crate) fn remove_component(&mut self, id: ComponentId) -> Option<Component> {
        self.components.remove(id)
    }

    fn subsystem_index(&self, kind: SubsystemKind) -> Result<usize, EcsError> {
        self.index
            .get(&kind)
            .copied()
            .ok_or(EcsError::MissingSubsystem(kind))
    }
}

/// Collaborators handed to hooks and component callbacks
pub struct FrameContext<'a> {
    /// Entities, components and subsystems
    pub registry: &'a mut Registry,
    /// Graphics API
    pub graphics: &'a mut dyn GraphicsBackend,
    /// Input sampled at the start of the frame
    pub input: &'a InputState,
}

impl<'a> FrameContext<'a> {
    /// Bundle the collaborators
    pub fn new(registry: &'a mut Registry, graphics: &'a mut dyn GraphicsBackend, input: &'a InputState) -> Self {
        Self { registry, graphics, input }
    }

    /// Run one subsystem: before hook, member updates, after hook
    pub(crate) fn run_subsystem(&mut self, id: SubsystemId, dt: f32) -> Result<(), EngineError> {
        self.with_hooks(id.0, |hooks, ctx| hooks.before_frame(ctx, dt))?;

        let members = match self.registry.subsystems.get(id.0) {
            Some(subsystem) => subsystem.members(),
            None => return Ok(()),
        };
        for member in members {
            self.update_component(member, dt)?;
        }

        self.with_hooks(id.0, |hooks, ctx| hooks.after_frame(ctx, dt))
    }

    /// Attach `component` to `entity`, claiming it at once if the entity is registered
    pub(crate) fn attach_component(&mut self, component: ComponentId, entity: EntityId) -> Result<(), EngineError> {
        let record = self
            .registry
            .components
            .get(component)
            .ok_or(EcsError::UnknownComponent(component))?;
        let kind = record.kind();
        if record.is_attached() {
            return Err(EcsError::AlreadyAttached(component).into());
        }

        let target = self
            .registry
            .entities
            .get(entity)
            .ok_or(EcsError::UnknownEntity(entity))?;
        if self.registry.get_component(entity, kind).is_some() {
            return Err(EcsError::DuplicateComponent { entity, kind }.into());
        }
        let registered = target.is_registered();
        if registered {
            self.registry.subsystem_index(kind)?;
        }

        if let Some(record) = self.registry.components.get_mut(component) {
            record.set_entity(Some(entity));
        }
        if let Some(target) = self.registry.entities.get_mut(entity) {
            target.push(component);
        }

        if registered {
            if let Err(err) = self.claim(component) {
                if let Some(record) = self.registry.components.get_mut(component) {
                    record.set_entity(None);
                }
                if let Some(target) = self.registry.entities.get_mut(entity) {
                    target.forget(component);
                }
                return Err(err);
            }
        }
        log::trace!("Attached {} component {:?} to entity {:?}", kind, component, entity);
        Ok(())
    }

    /// Add `entity` to the game, claiming every attached component
    pub(crate) fn register_entity(&mut self, entity: EntityId) -> Result<(), EngineError> {
        let record = self
            .registry
            .entities
            .get(entity)
            .ok_or(EcsError::UnknownEntity(entity))?;
        if record.is_registered() {
            return Err(EcsError::AlreadyRegistered(entity).into());
        }

        let attached = record.components().to_vec();
        for component in &attached {
            let kind = self
                .registry
                .components
                .get(*component)
                .ok_or(EcsError::UnknownComponent(*component))?
                .kind();
            self.registry.subsystem_index(kind)?;
        }

        if let Some(record) = self.registry.entities.get_mut(entity) {
            record.set_registered(true);
        }
        let mut claimed = Vec::with_capacity(attached.len());
        for component in attached {
            if let Err(err) = self.claim(component) {
                for earlier in claimed.into_iter().rev() {
                    if let Err(undo) = self.release(earlier) {
                        log::warn!("Failed to release component {:?}: {}", earlier, undo);
                    }
                }
                if let Some(record) = self.registry.entities.get_mut(entity) {
                    record.set_registered(false);
                }
                return Err(err);
            }
            claimed.push(component);
        }
        log::debug!("Registered entity {:?}", entity);
        Ok(())
    }

    /// Hand `component` to the subsystem of its kind
    pub(crate) fn claim(&mut self, component: ComponentId) -> Result<(), EngineError> {
        let record = self
            .registry
            .components
            .get(component)
            .ok_or(EcsError::UnknownComponent(component))?;
        if record.is_claimed() {
            return Err(EcsError::AlreadyClaimed(component).into());
        }
        let index = self.registry.subsystem_index(record.kind())?;

        self.registry.subsystems[index]
            .push_member(component)
            .map_err(EcsError::from)?;
        if let Some(record) = self.registry.components.get_mut(component) {
            record.set_claimed(true);
        }

        let added = self.with_hooks(index, |hooks, ctx| hooks.on_component_added(ctx, component));
        if added.is_err() {
            self.unclaim(component, index)?;
        }
        added
    }

    /// Hand a claimed `component` back: removal hook, then drop the membership
    fn release(&mut self, component: ComponentId) -> Result<(), EngineError> {
        let kind = self
            .registry
            .components
            .get(component)
            .ok_or(EcsError::UnknownComponent(component))?
            .kind();
        let index = self.registry.subsystem_index(kind)?;

        let removed = self.with_hooks(index, |hooks, ctx| hooks.on_component_removed(ctx, component));
        self.unclaim(component, index)?;
        removed
    }

    fn unclaim(&mut self, component: ComponentId, index: usize) -> Result<(), EngineError> {
        self.registry.subsystems[index]
            .remove_member(component)
            .map_err(EcsError::from)?;
        if let Some(record) = self.registry.components.get_mut(component) {
            record.set_claimed(false);
        }
        Ok(())
    }

    /// Release `component` from its subsystem, run its cleanup and drop it
    pub(crate) fn destroy_component(&mut self, component: ComponentId) -> Result<(), EngineError> {
        let record = self
            .registry
            .components
            .get(component)
            .ok_or(EcsError::UnknownComponent(component))?;
        let kind = record.kind();
        let entity = record.entity();

        let mut outcome = Ok(());
        if record.is_claimed() {
            outcome = self.release(component);
        }

        let behavior = self
            .registry
            .components
            .get_mut(component)
            .and_then(|record| record.behavior.take());
        if let Some(mut behavior) = behavior {
            let cleaned = behavior.cleanup(self, component);
            if outcome.is_ok() {
                outcome = cleaned;
            }
        }

        if let Some(entity) = entity.and_then(|entity| self.registry.entities.get_mut(entity)) {
            entity.forget(component);
        }
        self.registry.components.remove(component);
        log::trace!("Destroyed {} component {:?}", kind, component);
        outcome
    }

    /// Destroy every component of `entity`, newest first, then the entity
    pub(crate) fn destroy_entity(&mut self, entity: EntityId) -> Result<(), EngineError> {
        let attached = self
            .registry
            .entities
            .get(entity)
            .ok_or(EcsError::UnknownEntity(entity))?
            .components()
            .to_vec();

        let mut outcome = Ok(());
        for component in attached.into_iter().rev() {
            let destroyed = self.destroy_component(component);
            if outcome.is_ok() {
                outcome = destroyed;
            }
        }

        self.registry.entities.remove(entity);
        log::debug!("Destroyed entity {:?}", entity);
        outcome
    }

    fn update_component(&mut self, component: ComponentId, dt: f32) -> Result<(), EngineError> {
        let behavior = self
            .registry
            .components
            .get_mut(component)
            .and_then(|record| record.behavior.take());
        let Some(mut behavior) = behavior else {
            return Ok(());
        };

        let result = behavior.update(self, component, dt);
        if let Some(record) = self.registry.components.get_mut(component) {
            record.behavior = Some(behavior);
        }
        result
    }

    fn with_hooks<F>(&mut self, index: usize, call: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut dyn SubsystemHooks, &mut FrameContext<'a>) -> Result<(), EngineError>,
    {
        let hooks = self
            .registry
            .subsystems
            .get_mut(index)
            .and_then(|subsystem| subsystem.hooks.take());
        let Some(mut hooks) = hooks else {
            return Ok(());
        };

        let result = call(hooks.as_mut(), self);
        if let Some(subsystem) = self.registry.subsystems.get_mut(index) {
            subsystem.hooks = Some(hooks);
        }
        result
    }
}

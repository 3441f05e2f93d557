//! Entity-Component-Subsystem runtime
//!
//! Entities are bags of components, at most one per subsystem kind. Each
//! component is claimed by the subsystem of its kind when its entity joins the
//! game, and subsystems are updated in registration order: before hook, member
//! updates in attachment order, after hook.
//!
//! Records live in slotmap arenas inside the [`Registry`]; everything outside
//! it holds generation-checked ids.

use std::fmt;

use slotmap::new_key_type;
use thiserror::Error;

use crate::foundation::collections::ArrayError;
use crate::physics::PhysicsError;

pub mod component;
pub mod components;
pub mod entity;
pub mod registry;
pub mod subsystem;
pub mod subsystems;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentBehavior};
pub use entity::Entity;
pub use registry::{FrameContext, Registry};
pub use subsystem::{Subsystem, SubsystemHooks};

new_key_type! {
    /// Handle to an entity owned by the game's registry
    pub struct EntityId;

    /// Handle to a component owned by the game's registry
    pub struct ComponentId;
}

/// Position of a subsystem in the update order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubsystemId(pub(crate) usize);

impl SubsystemId {
    /// Zero-based registration index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity shared by a subsystem and the components it claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsystemKind {
    /// Fixed-step body integration
    Physics,
    /// Mesh drawing
    Render,
    /// Application-defined subsystem
    Named(&'static str),
}

impl SubsystemKind {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Physics => "physics",
            Self::Render => "render",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for SubsystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Composition and lookup errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EcsError {
    /// Component already belongs to an entity
    #[error("component {0:?} is already attached to an entity")]
    AlreadyAttached(ComponentId),

    /// Component already claimed by its subsystem
    #[error("component {0:?} is already claimed by a subsystem")]
    AlreadyClaimed(ComponentId),

    /// Entity already added to the game
    #[error("entity {0:?} is already registered with the game")]
    AlreadyRegistered(EntityId),

    /// Entity already holds a component of this kind
    #[error("entity {entity:?} already has a {kind} component")]
    DuplicateComponent {
        /// Target entity
        entity: EntityId,
        /// Conflicting kind
        kind: SubsystemKind,
    },

    /// A subsystem of this kind is already registered
    #[error("a {0} subsystem is already registered")]
    DuplicateSubsystem(SubsystemKind),

    /// No subsystem registered for a component's kind
    #[error("no {0} subsystem is registered")]
    MissingSubsystem(SubsystemKind),

    /// Sibling lookup found nothing usable
    #[error("entity {entity:?} has no {kind} component")]
    MissingSibling {
        /// Entity searched
        entity: EntityId,
        /// Kind requested
        kind: SubsystemKind,
    },

    /// Component behavior is not the type a subsystem expects
    #[error("component {component:?} does not carry a {expected} behavior")]
    UnexpectedBehavior {
        /// Offending component
        component: ComponentId,
        /// Expected behavior type
        expected: &'static str,
    },

    /// Stale or foreign entity id
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// Stale, foreign or detached component id
    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentId),

    /// Member list storage failure
    #[error(transparent)]
    Storage(#[from] ArrayError),

    /// Physics world rejected an operation
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

//! Physics body component

use std::any::Any;

use crate::physics::{Body, BodyHandle, PhysicsWorld};
use crate::ecs::{Component, ComponentBehavior, SubsystemKind};

#[derive(Debug, Clone)]
enum BodyLink {
    Pending(Body),
    Linked(BodyHandle),
    Released,
}

/// Gives an entity a simulated body
///
/// The body waits inside the component until the physics subsystem claims it
/// and moves it into its world; from then on only the handle is kept here.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    link: BodyLink,
}

impl PhysicsBody {
    /// Wrap a body not yet in any world
    pub fn new(body: Body) -> Self {
        Self {
            link: BodyLink::Pending(body),
        }
    }

    /// Physics component carrying `body`
    pub fn component(body: Body) -> Component {
        Component::with_behavior(SubsystemKind::Physics, Self::new(body))
    }

    /// World handle once linked
    pub fn handle(&self) -> Option<BodyHandle> {
        match self.link {
            BodyLink::Linked(handle) => Some(handle),
            _ => None,
        }
    }

    /// The body before it is linked
    pub fn pending(&self) -> Option<&Body> {
        match &self.link {
            BodyLink::Pending(body) => Some(body),
            _ => None,
        }
    }

    /// Move the pending body into `world`; `None` if it already left
    pub(crate) fn link(&mut self, world: &mut PhysicsWorld) -> Option<BodyHandle> {
        match std::mem::replace(&mut self.link, BodyLink::Released) {
            BodyLink::Pending(body) => {
                let handle = world.add_body(body);
                self.link = BodyLink::Linked(handle);
                Some(handle)
            }
            other => {
                self.link = other;
                None
            }
        }
    }

    /// Take the body back out of `world` so it can be linked again
    pub(crate) fn unlink(&mut self, world: &mut PhysicsWorld) -> bool {
        let Some(handle) = self.handle() else {
            return false;
        };
        match world.remove_body(handle) {
            Some(body) => {
                self.link = BodyLink::Pending(body);
                true
            }
            None => {
                self.link = BodyLink::Released;
                false
            }
        }
    }
}

impl ComponentBehavior for PhysicsBody {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

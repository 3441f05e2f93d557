//! Physics world: body storage and fixed-step integration

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Vec3;
use super::body::Body;
use super::PhysicsError;

new_key_type! {
    /// Generation-checked reference to a body owned by a [`PhysicsWorld`]
    pub struct BodyHandle;
}

/// Axis-aligned box that dynamic bodies are kept inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl WorldBounds {
    /// Create bounds from two corners, in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// True if `point` lies inside or on the box
    pub fn contains(&self, point: &Vec3) -> bool {
        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    /// Clamp a body back into the box, zeroing velocity on every axis it crossed
    fn confine(&self, body: &mut Body) {
        let mut position = body.position();
        let mut velocity = body.velocity();
        let mut crossed = false;

        for axis in 0..3 {
            if position[axis] < self.min[axis] {
                position[axis] = self.min[axis];
                velocity[axis] = 0.0;
                crossed = true;
            } else if position[axis] > self.max[axis] {
                position[axis] = self.max[axis];
                velocity[axis] = 0.0;
                crossed = true;
            }
        }

        if crossed {
            body.set_position(position);
            body.set_velocity(velocity);
        }
    }
}

/// Integration domain for a set of bodies
///
/// Bodies are moved into the world and addressed by [`BodyHandle`] afterwards,
/// so a body can never be linked twice or into two worlds. Integration visits
/// bodies most-recently-added first.
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    bodies: SlotMap<BodyHandle, Body>,
    order: Vec<BodyHandle>,
    bounds: Option<WorldBounds>,
}

impl PhysicsWorld {
    /// Create an empty, unbounded world
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `body` and link it at the head of the integration order
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.insert(body);
        self.order.push(handle);
        log::trace!("Added body {:?}, world now holds {}", handle, self.bodies.len());
        handle
    }

    /// Unlink a body and hand it back
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        let body = self.bodies.remove(handle)?;
        self.order.retain(|linked| *linked != handle);
        log::trace!("Removed body {:?}", handle);
        Some(body)
    }

    /// True if `handle` refers to a body still in this world
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Look up a body mutably
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Apply a force to the body behind `handle`
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3) -> Result<(), PhysicsError> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody)?
            .apply_force(force);
        Ok(())
    }

    /// Number of linked bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True when no bodies are linked
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over bodies in integration order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.order
            .iter()
            .rev()
            .filter_map(|handle| self.bodies.get(*handle).map(|body| (*handle, body)))
    }

    /// Keep dynamic bodies inside `bounds`, or lift the restriction with `None`
    pub fn set_bounds(&mut self, bounds: Option<WorldBounds>) {
        self.bounds = bounds;
    }

    /// Active bounds, if any
    pub fn bounds(&self) -> Option<WorldBounds> {
        self.bounds
    }

    /// Integrate every dynamic body by one step of `dt` seconds
    pub fn step(&mut self, dt: f32) {
        for handle in self.order.iter().rev() {
            let Some(body) = self.bodies.get_mut(*handle) else {
                continue;
            };
            if body.is_static() {
                continue;
            }

            body.integrate(dt);
            if let Some(bounds) = &self.bounds {
                bounds.confine(body);
            }
        }
    }
}

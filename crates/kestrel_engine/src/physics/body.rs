//! Point-mass rigid bodies

use crate::foundation::math::Vec3;
use super::PhysicsError;

/// Whether integration moves a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Velocity and position are integrated every step
    Dynamic,
    /// Never moved by integration
    Static,
}

/// A simulated point mass
///
/// Forces accumulate into `acceleration` until the next world step, which folds
/// them into velocity and position and then clears them.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    inverse_mass: f32,
    kind: BodyKind,
}

impl Body {
    /// Create a dynamic body at rest at the origin
    ///
    /// `mass` must be finite and greater than zero.
    pub fn new(mass: f32) -> Result<Self, PhysicsError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidMass(mass));
        }

        Ok(Self {
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            inverse_mass: 1.0 / mass,
            kind: BodyKind::Dynamic,
        })
    }

    /// Create an immovable body at the origin
    pub fn new_static() -> Self {
        Self {
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            inverse_mass: 0.0,
            kind: BodyKind::Static,
        }
    }

    /// Set the starting position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the starting velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Accumulate `force / mass` into the pending acceleration
    ///
    /// Velocity is untouched until the next step. Static bodies have zero
    /// inverse mass, so forces on them are absorbed.
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force * self.inverse_mass;
    }

    /// Advance one explicit Euler step of length `dt`
    ///
    /// Velocity is updated first and the new velocity moves the position.
    /// Static bodies are left exactly as they are.
    pub fn integrate(&mut self, dt: f32) {
        if self.kind == BodyKind::Static {
            return;
        }

        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        self.acceleration = Vec3::zeros();
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the body, bypassing integration
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Overwrite the velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Acceleration accumulated since the last step
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Mass in kilograms, infinite for static bodies
    pub fn mass(&self) -> f32 {
        if self.inverse_mass == 0.0 {
            f32::INFINITY
        } else {
            1.0 / self.inverse_mass
        }
    }

    /// Reciprocal of the mass, zero for static bodies
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Dynamic or static
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Shorthand for `kind() == BodyKind::Static`
    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }
}

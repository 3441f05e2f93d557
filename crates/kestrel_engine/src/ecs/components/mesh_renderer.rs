//! Mesh renderer component
//!
//! Draws a mesh at the position of the entity's physics body. The body is
//! found through the sibling physics component every frame, so the renderer
//! never holds a reference into the physics world.

use std::any::Any;

use crate::ecs::registry::FrameContext;
use crate::ecs::subsystems::PhysicsSubsystem;
use crate::ecs::{Component, ComponentBehavior, ComponentId, EcsError, SubsystemKind};
use crate::engine::EngineError;
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::render::{MeshId, ShaderParam};

/// Shader parameter receiving the model matrix
pub const MODEL_PARAMETER: &str = "u_model";

/// Draws an uploaded mesh at the entity's body position
#[derive(Debug, Clone)]
pub struct MeshRenderer {
    mesh: MeshId,
    scale: f32,
    model: Mat4,
    world_position: Option<Vec3>,
}

impl MeshRenderer {
    /// Renderer for `mesh` at unit scale
    pub fn new(mesh: MeshId) -> Self {
        Self {
            mesh,
            scale: 1.0,
            model: Mat4::identity(),
            world_position: None,
        }
    }

    /// Uniform scale applied to the mesh
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Render component drawing `mesh`
    pub fn component(mesh: MeshId) -> Component {
        Component::with_behavior(SubsystemKind::Render, Self::new(mesh))
    }

    /// Mesh drawn
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// Model matrix used for the latest draw
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model
    }

    /// Body position resolved for the latest draw
    pub fn world_position(&self) -> Option<Vec3> {
        self.world_position
    }
}

impl ComponentBehavior for MeshRenderer {
    fn update(&mut self, ctx: &mut FrameContext<'_>, id: ComponentId, _dt: f32) -> Result<(), EngineError> {
        let entity = ctx
            .registry
            .component(id)
            .and_then(Component::entity)
            .ok_or(EcsError::UnknownComponent(id))?;
        let position = PhysicsSubsystem::body_of(ctx.registry, entity)?.position();

        self.model = Transform::from_position_scale(position, self.scale).to_matrix();
        self.world_position = Some(position);

        ctx.graphics.set_parameter(MODEL_PARAMETER, ShaderParam::Mat4(self.model))?;
        ctx.graphics.draw_mesh(self.mesh)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

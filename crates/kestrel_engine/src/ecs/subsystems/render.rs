//! Render subsystem: default shader and camera state

use std::any::Any;

use crate::ecs::registry::FrameContext;
use crate::ecs::{Subsystem, SubsystemHooks, SubsystemKind};
use crate::engine::EngineError;
use crate::foundation::collections::ArrayError;
use crate::render::{Camera, GraphicsBackend, GraphicsError, ShaderId, ShaderParam, ShaderSource};

/// Shader parameter receiving the view matrix
pub const VIEW_PARAMETER: &str = "u_view";

/// Shader parameter receiving the projection matrix
pub const PROJECTION_PARAMETER: &str = "u_projection";

const DEFAULT_VERTEX_SHADER: &str = r"#version 330 core
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
out vec3 v_normal;
void main() {
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
";

const DEFAULT_FRAGMENT_SHADER: &str = r"#version 330 core
in vec3 v_normal;
out vec4 frag_color;
void main() {
    float light = max(dot(normalize(v_normal), normalize(vec3(0.4, 1.0, 0.6))), 0.15);
    frag_color = vec4(vec3(light), 1.0);
}
";

/// Hooks for the [`SubsystemKind::Render`] subsystem
///
/// Binds the default shader and uploads the camera matrices once per frame,
/// before any member component draws.
#[derive(Debug, Clone)]
pub struct RenderSubsystem {
    shader: ShaderId,
    camera: Camera,
}

impl RenderSubsystem {
    /// Compile the default shader on `graphics` and look through `camera`
    pub fn new(graphics: &mut dyn GraphicsBackend, camera: Camera) -> Result<Self, GraphicsError> {
        let shader = graphics.compile_shader(&ShaderSource::new(
            "default",
            DEFAULT_VERTEX_SHADER,
            DEFAULT_FRAGMENT_SHADER,
        ))?;
        Ok(Self { shader, camera })
    }

    /// Wrap into a registrable subsystem
    pub fn into_subsystem(self) -> Result<Subsystem, ArrayError> {
        Subsystem::with_hooks(SubsystemKind::Render, self)
    }

    /// Default shader
    pub fn shader(&self) -> ShaderId {
        self.shader
    }

    /// Active camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Active camera, mutably
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

impl SubsystemHooks for RenderSubsystem {
    fn before_frame(&mut self, ctx: &mut FrameContext<'_>, _dt: f32) -> Result<(), EngineError> {
        ctx.graphics.bind_shader(self.shader)?;
        ctx.graphics
            .set_parameter(VIEW_PARAMETER, ShaderParam::Mat4(self.camera.view_matrix()))?;
        ctx.graphics
            .set_parameter(PROJECTION_PARAMETER, ShaderParam::Mat4(self.camera.projection_matrix()))?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

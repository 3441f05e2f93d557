//! Backend abstraction for the graphics API
//!
//! The engine core only needs to compile and bind a shader, set named shader
//! parameters and draw uploaded meshes. Everything below that line (buffer
//! layout, shader language, render targets) belongs to the backend.

use std::collections::HashMap;

use thiserror::Error;

use crate::foundation::math::{Mat4, Vec3, Vec4};
use super::mesh::Mesh;

/// Handle to a compiled shader program stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u64);

/// Handle to a mesh uploaded to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// Shader stage sources handed to [`GraphicsBackend::compile_shader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Label used in diagnostics
    pub name: String,
    /// Vertex stage source
    pub vertex: String,
    /// Fragment stage source
    pub fragment: String,
}

impl ShaderSource {
    /// Create a shader source description
    pub fn new(name: impl Into<String>, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Typed value for a named shader parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShaderParam {
    /// Integer scalar
    Int(i32),
    /// Float scalar
    Float(f32),
    /// Three-component vector
    Vec3(Vec3),
    /// Four-component vector
    Vec4(Vec4),
    /// 4x4 matrix
    Mat4(Mat4),
}

/// Graphics backend errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// Shader failed to compile or link; carries the backend's log
    #[error("shader '{name}' failed to compile: {log}")]
    ShaderCompile {
        /// Shader label
        name: String,
        /// Backend-reported error text
        log: String,
    },

    /// Shader handle not known to the backend
    #[error("unknown shader {0:?}")]
    UnknownShader(ShaderId),

    /// Mesh handle not known to the backend
    #[error("unknown mesh {0:?}")]
    UnknownMesh(MeshId),

    /// A parameter was set or a mesh drawn with no shader bound
    #[error("no shader bound")]
    NoShaderBound,

    /// Backend-specific failure
    #[error("graphics backend error: {0}")]
    Backend(String),
}

/// Operations the engine core needs from a graphics API
pub trait GraphicsBackend {
    /// Compile and link a shader program
    fn compile_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, GraphicsError>;

    /// Make `shader` current for subsequent parameters and draws
    fn bind_shader(&mut self, shader: ShaderId) -> Result<(), GraphicsError>;

    /// Set a named parameter on the bound shader
    fn set_parameter(&mut self, name: &str, value: ShaderParam) -> Result<(), GraphicsError>;

    /// Upload mesh geometry and return a handle for drawing it
    fn upload_mesh(&mut self, mesh: &Mesh) -> Result<MeshId, GraphicsError>;

    /// Draw an uploaded mesh with the bound shader and current parameters
    fn draw_mesh(&mut self, mesh: MeshId) -> Result<(), GraphicsError>;

    /// Access the concrete type for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Mutable access to the concrete type for downcasting
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// A call observed by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `bind_shader`
    BindShader(ShaderId),
    /// `set_parameter`
    SetParameter(String, ShaderParam),
    /// `draw_mesh`
    Draw(MeshId),
}

/// Graphics backend that validates and records calls without a GPU
///
/// Used by headless runs and tests. Shaders whose sources are empty fail to
/// compile so error paths can be exercised.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    shaders: HashMap<ShaderId, String>,
    meshes: HashMap<MeshId, usize>,
    next_id: u64,
    bound: Option<ShaderId>,
    parameters: HashMap<String, ShaderParam>,
    commands: Vec<DrawCommand>,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every bind, parameter and draw call seen so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget recorded commands (resources stay alive)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Latest value set for a parameter name
    pub fn parameter(&self, name: &str) -> Option<&ShaderParam> {
        self.parameters.get(name)
    }

    /// Number of draw calls recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Draw(_)))
            .count()
    }

    /// Triangle count of an uploaded mesh
    pub fn mesh_triangles(&self, mesh: MeshId) -> Option<usize> {
        self.meshes.get(&mesh).copied()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsBackend for RecordingBackend {
    fn compile_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, GraphicsError> {
        if source.vertex.trim().is_empty() || source.fragment.trim().is_empty() {
            return Err(GraphicsError::ShaderCompile {
                name: source.name.clone(),
                log: "empty shader stage".to_string(),
            });
        }

        let id = ShaderId(self.allocate_id());
        self.shaders.insert(id, source.name.clone());
        log::debug!("Compiled shader '{}' as {:?}", source.name, id);
        Ok(id)
    }

    fn bind_shader(&mut self, shader: ShaderId) -> Result<(), GraphicsError> {
        if !self.shaders.contains_key(&shader) {
            return Err(GraphicsError::UnknownShader(shader));
        }
        self.bound = Some(shader);
        self.commands.push(DrawCommand::BindShader(shader));
        Ok(())
    }

    fn set_parameter(&mut self, name: &str, value: ShaderParam) -> Result<(), GraphicsError> {
        if self.bound.is_none() {
            return Err(GraphicsError::NoShaderBound);
        }
        self.parameters.insert(name.to_string(), value);
        self.commands.push(DrawCommand::SetParameter(name.to_string(), value));
        Ok(())
    }

    fn upload_mesh(&mut self, mesh: &Mesh) -> Result<MeshId, GraphicsError> {
        let id = MeshId(self.allocate_id());
        self.meshes.insert(id, mesh.triangle_count());
        Ok(id)
    }

    fn draw_mesh(&mut self, mesh: MeshId) -> Result<(), GraphicsError> {
        if self.bound.is_none() {
            return Err(GraphicsError::NoShaderBound);
        }
        if !self.meshes.contains_key(&mesh) {
            return Err(GraphicsError::UnknownMesh(mesh));
        }
        self.commands.push(DrawCommand::Draw(mesh));
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mesh::Vertex;

    fn quad() -> Mesh {
        let normal = [0.0, 0.0, 1.0];
        Mesh::new(
            &[
                Vertex::new([0.0, 0.0, 0.0], normal),
                Vertex::new([1.0, 0.0, 0.0], normal),
                Vertex::new([1.0, 1.0, 0.0], normal),
                Vertex::new([0.0, 1.0, 0.0], normal),
            ],
            &[0, 1, 2, 0, 2, 3],
        )
        .unwrap()
    }

    #[test]
    fn test_draw_requires_bound_shader() {
        let mut backend = RecordingBackend::new();
        let mesh = backend.upload_mesh(&quad()).unwrap();
        assert_eq!(backend.mesh_triangles(mesh), Some(2));
        assert_eq!(backend.draw_mesh(mesh).unwrap_err(), GraphicsError::NoShaderBound);

        let shader = backend
            .compile_shader(&ShaderSource::new("flat", "void main() {}", "void main() {}"))
            .unwrap();
        backend.bind_shader(shader).unwrap();
        backend.set_parameter("u_tint", ShaderParam::Float(0.5)).unwrap();
        backend.draw_mesh(mesh).unwrap();

        assert_eq!(
            backend.commands(),
            &[
                DrawCommand::BindShader(shader),
                DrawCommand::SetParameter("u_tint".to_string(), ShaderParam::Float(0.5)),
                DrawCommand::Draw(mesh),
            ]
        );
        assert_eq!(backend.draw_count(), 1);
    }

    #[test]
    fn test_compile_failure_reports_log() {
        let mut backend = RecordingBackend::new();
        let err = backend
            .compile_shader(&ShaderSource::new("broken", "", "void main() {}"))
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_unknown_handles_rejected() {
        let mut backend = RecordingBackend::new();
        assert_eq!(
            backend.bind_shader(ShaderId(42)).unwrap_err(),
            GraphicsError::UnknownShader(ShaderId(42))
        );
        let shader = backend
            .compile_shader(&ShaderSource::new("flat", "v", "f"))
            .unwrap();
        backend.bind_shader(shader).unwrap();
        assert_eq!(
            backend.draw_mesh(MeshId(7)).unwrap_err(),
            GraphicsError::UnknownMesh(MeshId(7))
        );
    }
}

//! Triangle mesh geometry
//!
//! Vertex and index data are kept in [`DynArray`]s so the packed bytes can be
//! handed to a graphics backend as-is.

use bytemuck::{Pod, Zeroable};

use crate::foundation::collections::{ArrayError, DynArray};

/// Vertex layout shared by every mesh: position then normal, tightly packed
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Object-space normal
    pub normal: [f32; 3],
}

impl Vertex {
    /// Create a vertex
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: DynArray,
    indices: DynArray,
}

impl Mesh {
    /// Build a mesh from vertices and a triangle index list
    ///
    /// Fails if the index count is not a multiple of three or any index points
    /// past the vertex list.
    pub fn new(vertices: &[Vertex], indices: &[u32]) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(indices.len()));
        }
        if let Some(&bad) = indices.iter().find(|&&index| index as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index: bad,
                vertex_count: vertices.len(),
            });
        }

        let mut vertex_array = DynArray::for_type::<Vertex>()?;
        for vertex in vertices {
            vertex_array.push_value(vertex)?;
        }

        let mut index_array = DynArray::for_type::<u32>()?;
        for index in indices {
            index_array.push_value(index)?;
        }

        Ok(Self {
            vertices: vertex_array,
            indices: index_array,
        })
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Size of one vertex in bytes
    pub fn vertex_stride(&self) -> usize {
        self.vertices.element_size()
    }

    /// Packed vertex bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        self.vertices.as_bytes()
    }

    /// Packed `u32` index bytes
    pub fn index_bytes(&self) -> &[u8] {
        self.indices.as_bytes()
    }

    /// Read back one vertex
    pub fn vertex(&self, index: usize) -> Result<Vertex, ArrayError> {
        self.vertices.read_value(index)
    }
}

/// Mesh construction errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Index list does not describe whole triangles
    #[error("{0} indices do not form whole triangles")]
    IncompleteTriangle(usize),

    /// Index refers past the end of the vertex list
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Vertices available
        vertex_count: usize,
    },

    /// Storage error
    #[error(transparent)]
    Storage(#[from] ArrayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> [Vertex; 3] {
        [
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn test_mesh_packs_vertices() {
        let mesh = Mesh::new(&triangle(), &[0, 1, 2]).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_stride(), 24);
        assert_eq!(mesh.vertex_bytes().len(), 72);
        assert_eq!(mesh.index_bytes().len(), 12);
        assert_eq!(mesh.vertex(1).unwrap(), triangle()[1]);
    }

    #[test]
    fn test_mesh_validates_indices() {
        assert_eq!(
            Mesh::new(&triangle(), &[0, 1]).unwrap_err(),
            MeshError::IncompleteTriangle(2)
        );
        assert_eq!(
            Mesh::new(&triangle(), &[0, 1, 3]).unwrap_err(),
            MeshError::IndexOutOfRange { index: 3, vertex_count: 3 }
        );
    }
}

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::CcdMesh;
use core::fmt;

/// Indicated an inconsistency while building a triangle mesh.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriMeshBuilderError {
    /// A flat index buffer must have a length multiple of 3.
    #[error("the index buffer length {0} is not a multiple of 3.")]
    NonTriangularIndexCount(usize),
    /// A triangle references a vertex that does not exist.
    #[error("the triangle {triangle} references the vertex {vertex} but the mesh only has {num_vertices} vertices.")]
    IndexOutOfBounds {
        /// The triangle with an invalid index.
        triangle: u32,
        /// The invalid vertex index.
        vertex: u32,
        /// The number of vertices of the mesh.
        num_vertices: usize,
    },
}

/// A triangle mesh with a vertex buffer and an index buffer.
///
/// This is a minimal storage implementing [`CcdMesh`]. Meshes from other sources can be tracked
/// by the engine as well by implementing [`CcdMesh`] directly.
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TriMesh {
    vertices: Vec<Point<Real>>,
    indices: Vec<[u32; 3]>,
}

impl fmt::Debug for TriMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriMesh")
            .field("num_vertices", &self.vertices.len())
            .field("num_triangles", &self.indices.len())
            .finish()
    }
}

impl TriMesh {
    /// Creates a new triangle mesh from a vertex buffer and an index buffer.
    ///
    /// Fails if any index is out of bounds of the vertex buffer.
    pub fn new(
        vertices: Vec<Point<Real>>,
        indices: Vec<[u32; 3]>,
    ) -> Result<Self, TriMeshBuilderError> {
        let num_vertices = vertices.len();

        for (triangle, idx) in indices.iter().enumerate() {
            if let Some(vertex) = idx.iter().find(|vid| **vid as usize >= num_vertices) {
                return Err(TriMeshBuilderError::IndexOutOfBounds {
                    triangle: triangle as u32,
                    vertex: *vertex,
                    num_vertices,
                });
            }
        }

        Ok(Self { vertices, indices })
    }

    /// Creates a new triangle mesh from a vertex buffer and a flat index buffer where each
    /// consecutive triple of indices is one triangle.
    pub fn from_flat_indices(
        vertices: Vec<Point<Real>>,
        indices: &[u32],
    ) -> Result<Self, TriMeshBuilderError> {
        if indices.len() % 3 != 0 {
            return Err(TriMeshBuilderError::NonTriangularIndexCount(indices.len()));
        }

        let indices = indices
            .chunks_exact(3)
            .map(|idx| [idx[0], idx[1], idx[2]])
            .collect();
        Self::new(vertices, indices)
    }

    /// Creates a mesh made of isolated points.
    ///
    /// Each point becomes a degenerate triangle `[i, i, i]`, so it takes part in collision
    /// detection as a vertex only (it never acts as a triangle or an edge).
    pub fn from_points(points: Vec<Point<Real>>) -> Self {
        let indices = (0..points.len() as u32).map(|i| [i, i, i]).collect();
        Self {
            vertices: points,
            indices,
        }
    }

    /// The vertex buffer of this mesh.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// Mutable access to the vertex positions of this mesh.
    ///
    /// The slice cannot be resized so the topology of the mesh is preserved.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [Point<Real>] {
        &mut self.vertices
    }

    /// The index buffer of this mesh.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Translates every vertex of this mesh.
    pub fn translate(&mut self, shift: &Vector<Real>) {
        self.vertices.iter_mut().for_each(|pt| *pt += shift);
    }

    /// Moves every vertex by its associated displacement.
    ///
    /// This is typically called once the displacements of a step have been validated by the
    /// collision response. `deltas` must have one element per vertex.
    pub fn apply_deltas(&mut self, deltas: &[Vector<Real>]) {
        for (pt, delta) in self.vertices.iter_mut().zip(deltas.iter()) {
            *pt += delta;
        }
    }

    /// The AABB of this mesh.
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().copied())
    }

    /// Decomposes this mesh into its vertex and index buffers.
    pub fn into_buffers(self) -> (Vec<Point<Real>>, Vec<[u32; 3]>) {
        (self.vertices, self.indices)
    }
}

impl CcdMesh for TriMesh {
    #[inline]
    fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    #[inline]
    fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }
}

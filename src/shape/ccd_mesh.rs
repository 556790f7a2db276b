use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};

/// Read-only access to the geometry of a triangle mesh.
///
/// This is the only view the collision-detection engine has on a mesh: it reads vertex
/// positions and triangle indices, and never writes anything back. Any mesh storage can be
/// tracked by implementing this trait.
///
/// Implementors must guarantee that every index of [`CcdMesh::indices`] is a valid offset into
/// [`CcdMesh::vertices`]. This is not checked by the engine.
pub trait CcdMesh {
    /// The vertex positions of this mesh.
    fn vertices(&self) -> &[Point<Real>];

    /// The triangles of this mesh, each given as three indices into [`CcdMesh::vertices`].
    fn indices(&self) -> &[[u32; 3]];

    /// The number of triangles of this mesh.
    #[inline]
    fn num_triangles(&self) -> usize {
        self.indices().len()
    }

    /// The positions of the three vertices of the `i`-th triangle.
    #[inline]
    fn triangle_points(&self, i: u32) -> [Point<Real>; 3] {
        let vertices = self.vertices();
        self.indices()[i as usize].map(|vid| vertices[vid as usize])
    }

    /// The AABB of the `i`-th triangle swept from its rest position to its rest position
    /// displaced by `deltas`.
    ///
    /// If `deltas` is `None` the triangle is static and this is its plain AABB.
    fn swept_triangle_aabb(&self, i: u32, deltas: Option<&[Vector<Real>]>) -> Aabb {
        let idx = self.indices()[i as usize];
        let pts = self.triangle_points(i);

        match deltas {
            Some(deltas) => {
                let tri_deltas = idx.map(|vid| deltas[vid as usize]);
                Aabb::from_swept_points(&pts, Some(&tri_deltas[..]))
            }
            None => Aabb::from_swept_points(&pts, None),
        }
    }
}

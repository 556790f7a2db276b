use crate::bounding_volume::Aabb;
use crate::ccd::{GeometryHandle, MeshOwnership};
use crate::math::{Point, Real, Vector};
use crate::shape::CcdMesh;
use alloc::sync::Arc;

/// The engine-side record of a tracked mesh.
#[derive(Debug)]
pub(crate) struct TrackedMesh<M> {
    pub mesh: Arc<M>,
    pub delta: Option<Vec<Vector<Real>>>,
    pub ownership: MeshOwnership,
    /// Allocated at the first rebuild following the registration.
    pub geometry: Option<GeometryHandle>,
    pub dirty: bool,
}

impl<M: CcdMesh> TrackedMesh<M> {
    pub fn new(mesh: Arc<M>, delta: Option<Vec<Vector<Real>>>) -> Self {
        let ownership = MeshOwnership::new(mesh.indices(), mesh.vertices().len());
        Self {
            mesh,
            delta,
            ownership,
            geometry: None,
            dirty: true,
        }
    }

    pub fn recompute_ownership(&mut self) {
        self.ownership = MeshOwnership::new(self.mesh.indices(), self.mesh.vertices().len());
    }

    #[inline]
    pub fn triangle(&self, i: u32) -> [u32; 3] {
        self.mesh.indices()[i as usize]
    }

    #[inline]
    pub fn position(&self, vid: u32) -> Point<Real> {
        self.mesh.vertices()[vid as usize]
    }

    /// The displacement of a vertex, zero for static meshes.
    #[inline]
    pub fn displacement(&self, vid: u32) -> Vector<Real> {
        self.delta
            .as_ref()
            .map(|delta| delta[vid as usize])
            .unwrap_or_else(Vector::zeros)
    }

    pub fn swept_triangle_aabb(&self, i: u32) -> Aabb {
        self.mesh.swept_triangle_aabb(i, self.delta.as_deref())
    }
}

use crate::bounding_volume::Aabb;
use crate::ccd::BroadPhaseError;

/// The identifier of a mesh tracked by a [`MeshCcd`](crate::ccd::MeshCcd) engine.
///
/// Handles are only meaningful for the engine that returned them. The handle of a detached
/// mesh may be reused by a mesh attached later.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MeshHandle(pub(crate) u32);

impl MeshHandle {
    /// The raw index of this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The identifier of a set of primitives registered into a [`BroadPhase`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct GeometryHandle(pub u32);

/// A triangle of a tracked mesh, as seen by the broad-phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Primitive {
    /// The mesh containing the triangle.
    pub mesh: MeshHandle,
    /// The index of the triangle in its mesh.
    pub triangle: u32,
}

/// A spatial index reporting the pairs of primitives with overlapping bounding boxes.
///
/// Each tracked mesh is registered as one geometry with one primitive per triangle. The bounds
/// of the primitives of a geometry are only read when the geometry is committed, and the
/// candidate pairs are only required to reflect the state of the index at the last call to
/// [`BroadPhase::commit_scene`].
pub trait BroadPhase {
    /// Prepares this broad-phase before its first use.
    fn initialize(&mut self) -> Result<(), BroadPhaseError> {
        Ok(())
    }

    /// Registers a new geometry made of `primitive_count` primitives, all belonging to the
    /// mesh `owner`.
    fn create_geometry(
        &mut self,
        owner: MeshHandle,
        primitive_count: usize,
    ) -> Result<GeometryHandle, BroadPhaseError>;

    /// Removes a geometry and all its primitives from this broad-phase.
    fn release_geometry(&mut self, handle: GeometryHandle);

    /// Updates the bounds of every primitive of a geometry.
    ///
    /// `bounds(i)` returns the AABB of the `i`-th primitive.
    fn commit_geometry(&mut self, handle: GeometryHandle, bounds: &mut dyn FnMut(u32) -> Aabb);

    /// Makes all the geometries committed since the last call visible to
    /// [`BroadPhase::for_each_candidate_pair`].
    fn commit_scene(&mut self);

    /// Calls `f` on each pair of primitives with overlapping bounds.
    ///
    /// Each unordered pair is reported at most once, and a primitive is never paired with itself.
    fn for_each_candidate_pair(&mut self, f: &mut dyn FnMut(Primitive, Primitive));

    /// The bounds of the primitives of a geometry, as of its last commit.
    fn geometry_aabbs(&self, handle: GeometryHandle) -> Option<&[Aabb]>;
}

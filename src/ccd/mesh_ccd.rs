use alloc::sync::Arc;
use crate::ccd::collide::{collide_primitives, CollideStats};
use crate::ccd::events::CallbackHandler;
use crate::ccd::tracked_mesh::TrackedMesh;
use crate::ccd::{
    BroadPhase, BvhBroadPhase, CcdError, CcdEventHandler, CcdEvents, CcdOptions,
    EdgeEdgeCollision, MeshHandle, MeshOwnership, TriVertCollision,
};
use crate::math::{Real, Vector};
use crate::shape::{CcdMesh, TriMesh};
use crate::utils::hashmap::HashMap;
use slab::Slab;

/// A continuous collision-detection engine for deforming triangle meshes.
///
/// Each step goes as follows:
/// 1. Meshes are registered with [`MeshCcd::attach`], together with their per-vertex
///    displacement for the step (which can be changed with [`MeshCcd::set_delta`]).
/// 2. [`MeshCcd::rebuild`] updates the swept bounding boxes of the modified meshes and the
///    broad-phase.
/// 3. [`MeshCcd::collide`] reports every contact happening while the vertices move linearly
///    from their rest position to their displaced position.
///
/// Meshes are shared with the caller through an [`Arc`]. The engine never modifies them, except
/// through [`MeshCcd::mesh_mut`] which clones the mesh if it is shared.
pub struct MeshCcd<M: CcdMesh = TriMesh, B: BroadPhase = BvhBroadPhase> {
    meshes: Slab<TrackedMesh<M>>,
    // Maps the address of a tracked mesh allocation to its handle.
    handles: HashMap<usize, MeshHandle>,
    broad_phase: B,
    options: CcdOptions,
}

impl<M: CcdMesh> Default for MeshCcd<M, BvhBroadPhase> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: CcdMesh> MeshCcd<M, BvhBroadPhase> {
    /// Creates an empty engine with default options, using a [`BvhBroadPhase`].
    pub fn new() -> Self {
        Self::with_options(CcdOptions::default())
    }

    /// Creates an empty engine with the given options, using a [`BvhBroadPhase`].
    pub fn with_options(options: CcdOptions) -> Self {
        Self {
            meshes: Slab::new(),
            handles: HashMap::default(),
            broad_phase: BvhBroadPhase::new(options.bvh_build_strategy),
            options,
        }
    }

    /// Replaces the options of this engine.
    ///
    /// A change of [`CcdOptions::bvh_build_strategy`] takes effect at the next
    /// [`MeshCcd::rebuild`].
    pub fn set_options(&mut self, options: CcdOptions) {
        self.broad_phase.set_build_strategy(options.bvh_build_strategy);
        self.options = options;
    }
}

impl<M: CcdMesh, B: BroadPhase> MeshCcd<M, B> {
    /// Creates an empty engine using a custom broad-phase.
    pub fn with_broad_phase(mut broad_phase: B, options: CcdOptions) -> Result<Self, CcdError> {
        broad_phase.initialize()?;
        Ok(Self {
            meshes: Slab::new(),
            handles: HashMap::default(),
            broad_phase,
            options,
        })
    }

    /// The options of this engine.
    pub fn options(&self) -> &CcdOptions {
        &self.options
    }

    /// The broad-phase of this engine.
    pub fn broad_phase(&self) -> &B {
        &self.broad_phase
    }

    /*
     * Registration.
     */
    /// Starts tracking a mesh, with an optional per-vertex displacement.
    ///
    /// If this exact mesh (i.e. the same [`Arc`] allocation) is already tracked, its handle is
    /// returned and its displacement is replaced by `delta`. Otherwise the ownership of its
    /// vertices and edges is computed, and the mesh will be added to the broad-phase at the next
    /// [`MeshCcd::rebuild`].
    pub fn attach(
        &mut self,
        mesh: Arc<M>,
        delta: Option<Vec<Vector<Real>>>,
    ) -> Result<MeshHandle, CcdError> {
        check_delta_len(mesh.as_ref(), delta.as_deref())?;

        if let Some(handle) = self.handle_of(&mesh) {
            let record = &mut self.meshes[handle.index()];
            record.delta = delta;
            record.dirty = true;
            return Ok(handle);
        }

        let address = mesh_address(&mesh);
        let handle = MeshHandle(self.meshes.insert(TrackedMesh::new(mesh, delta)) as u32);
        let _ = self.handles.insert(address, handle);
        log::debug!("Tracking the new mesh {:?}.", handle);
        Ok(handle)
    }

    /// Starts tracking a mesh that doesn’t move.
    pub fn attach_static(&mut self, mesh: Arc<M>) -> Result<MeshHandle, CcdError> {
        self.attach(mesh, None)
    }

    /// Stops tracking a mesh, and releases its broad-phase resources.
    ///
    /// Returns the mesh that was tracked.
    pub fn detach(&mut self, handle: MeshHandle) -> Result<Arc<M>, CcdError> {
        let Some(record) = self.meshes.try_remove(handle.index()) else {
            log::warn!("Attempted to detach the untracked mesh {:?}.", handle);
            return Err(CcdError::MeshNotFound(handle));
        };

        let _ = self.handles.remove(&mesh_address(&record.mesh));

        if let Some(geometry) = record.geometry {
            self.broad_phase.release_geometry(geometry);
        }

        Ok(record.mesh)
    }

    /// The handle of a mesh if it is tracked by this engine.
    pub fn handle_of(&self, mesh: &Arc<M>) -> Option<MeshHandle> {
        self.handles.get(&mesh_address(mesh)).copied()
    }

    /// Replaces the displacement of a tracked mesh.
    ///
    /// The ownership of the mesh features is left unchanged. The mesh is marked as dirty.
    pub fn set_delta(
        &mut self,
        handle: MeshHandle,
        delta: Option<Vec<Vector<Real>>>,
    ) -> Result<(), CcdError> {
        let record = self.record_mut(handle)?;
        check_delta_len(record.mesh.as_ref(), delta.as_deref())?;
        record.delta = delta;
        record.dirty = true;
        Ok(())
    }

    /// The displacement of a tracked mesh.
    pub fn delta(&self, handle: MeshHandle) -> Result<Option<&[Vector<Real>]>, CcdError> {
        Ok(self.record(handle)?.delta.as_deref())
    }

    /// Mutable access to the displacement slot of a tracked mesh.
    ///
    /// The mesh is marked as dirty. If set, the displacement must have exactly one element per
    /// vertex of the mesh. This is not checked.
    pub fn delta_mut(
        &mut self,
        handle: MeshHandle,
    ) -> Result<&mut Option<Vec<Vector<Real>>>, CcdError> {
        let record = self.record_mut(handle)?;
        record.dirty = true;
        Ok(&mut record.delta)
    }

    /// Flags a tracked mesh so its bounding boxes are recomputed at the next rebuild.
    ///
    /// This must be called whenever the vertex positions of the mesh are changed from outside
    /// of the engine.
    pub fn mark_dirty(&mut self, handle: MeshHandle) -> Result<(), CcdError> {
        self.record_mut(handle)?.dirty = true;
        Ok(())
    }

    /// Recomputes the ownership of the features of a tracked mesh after a change of its
    /// index buffer.
    ///
    /// The mesh is marked as dirty and its broad-phase geometry is reallocated at the next
    /// rebuild.
    pub fn topology_changed(&mut self, handle: MeshHandle) -> Result<(), CcdError> {
        let record = self.meshes.get_mut(handle.index()).ok_or(CcdError::MeshNotFound(handle))?;
        record.recompute_ownership();
        record.dirty = true;

        if let Some(geometry) = record.geometry.take() {
            self.broad_phase.release_geometry(geometry);
        }

        Ok(())
    }

    /// Replaces the mesh tracked with the given handle, keeping its displacement.
    ///
    /// Returns the previous mesh. Feature ownership is recomputed if the index buffer or the
    /// number of vertices changed.
    pub fn replace_mesh(&mut self, handle: MeshHandle, mesh: Arc<M>) -> Result<Arc<M>, CcdError> {
        let record = self.record(handle)?;
        check_delta_len(mesh.as_ref(), record.delta.as_deref())?;
        let same_topology = record.mesh.indices() == mesh.indices()
            && record.mesh.vertices().len() == mesh.vertices().len();
        let old_address = mesh_address(&record.mesh);

        let _ = self.handles.remove(&old_address);
        let _ = self.handles.insert(mesh_address(&mesh), handle);
        let record = &mut self.meshes[handle.index()];
        let old_mesh = core::mem::replace(&mut record.mesh, mesh);
        record.dirty = true;

        if !same_topology {
            self.topology_changed(handle)?;
        }

        Ok(old_mesh)
    }

    /// A tracked mesh.
    pub fn mesh(&self, handle: MeshHandle) -> Result<&Arc<M>, CcdError> {
        Ok(&self.record(handle)?.mesh)
    }

    /// Mutable access to a tracked mesh, cloning it first if it is shared.
    ///
    /// The mesh is marked as dirty. Call [`MeshCcd::topology_changed`] if its index buffer is
    /// modified.
    pub fn mesh_mut(&mut self, handle: MeshHandle) -> Result<&mut M, CcdError>
    where
        M: Clone,
    {
        let record = self.meshes.get_mut(handle.index()).ok_or(CcdError::MeshNotFound(handle))?;
        record.dirty = true;

        // The mesh is cloned if it is shared, which changes its address.
        let old_address = mesh_address(&record.mesh);
        let mesh = Arc::make_mut(&mut record.mesh);
        let new_address = (mesh as *const M).cast::<()>() as usize;

        if new_address != old_address {
            let _ = self.handles.remove(&old_address);
            let _ = self.handles.insert(new_address, handle);
        }

        Ok(mesh)
    }

    /// The ownership of the vertices and edges of a tracked mesh.
    pub fn ownership(&self, handle: MeshHandle) -> Result<&MeshOwnership, CcdError> {
        Ok(&self.record(handle)?.ownership)
    }

    /// Is the given mesh flagged for bounding box updates at the next rebuild?
    pub fn is_dirty(&self, handle: MeshHandle) -> Result<bool, CcdError> {
        Ok(self.record(handle)?.dirty)
    }

    /// The number of tracked meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Is no mesh tracked by this engine?
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Is the given handle associated to a tracked mesh?
    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.meshes.contains(handle.index())
    }

    /// Iterates through the handles of all the tracked meshes.
    pub fn iter_handles(&self) -> impl Iterator<Item = MeshHandle> + '_ {
        self.meshes.iter().map(|(key, _)| MeshHandle(key as u32))
    }

    fn record(&self, handle: MeshHandle) -> Result<&TrackedMesh<M>, CcdError> {
        self.meshes
            .get(handle.index())
            .ok_or(CcdError::MeshNotFound(handle))
    }

    fn record_mut(&mut self, handle: MeshHandle) -> Result<&mut TrackedMesh<M>, CcdError> {
        self.meshes
            .get_mut(handle.index())
            .ok_or(CcdError::MeshNotFound(handle))
    }

    /*
     * Collision detection.
     */
    /// Updates the broad-phase with the current state of the tracked meshes.
    ///
    /// Geometries are allocated for the meshes attached since the last rebuild, and the swept
    /// bounding boxes of the triangles of every dirty mesh are recomputed. This must be called
    /// before [`MeshCcd::collide`] whenever a mesh or a displacement changed.
    pub fn rebuild(&mut self) -> Result<(), CcdError> {
        let mut num_committed = 0;

        for (key, record) in self.meshes.iter_mut() {
            let geometry = match record.geometry {
                Some(geometry) => geometry,
                None => {
                    let geometry = self
                        .broad_phase
                        .create_geometry(MeshHandle(key as u32), record.mesh.num_triangles())?;
                    record.geometry = Some(geometry);
                    record.dirty = true;
                    geometry
                }
            };

            if record.dirty {
                self.broad_phase
                    .commit_geometry(geometry, &mut |i| record.swept_triangle_aabb(i));
                record.dirty = false;
                num_committed += 1;
            }
        }

        self.broad_phase.commit_scene();
        log::debug!(
            "Rebuilt the CCD broad-phase: {} geometries committed out of {}.",
            num_committed,
            self.meshes.len()
        );
        Ok(())
    }

    /// Finds all the contacts happening during the step, and reports them to the given closures.
    ///
    /// Only the state of the meshes at the last [`MeshCcd::rebuild`] is taken into account by
    /// the broad-phase. Calling this after modifying the meshes or displacements without
    /// rebuilding leads to missed contacts.
    pub fn collide(
        &mut self,
        on_tri_vert: impl FnMut(TriVertCollision),
        on_edge_edge: impl FnMut(EdgeEdgeCollision),
    ) {
        self.collide_with(&mut CallbackHandler(on_tri_vert, on_edge_edge))
    }

    /// Finds all the contacts happening during the step, and reports them to `handler`.
    pub fn collide_with(&mut self, handler: &mut impl CcdEventHandler) {
        let Self {
            meshes,
            broad_phase,
            options,
            ..
        } = self;
        let sweep_options = options.sweep_options();
        let mut stats = CollideStats::default();

        broad_phase.for_each_candidate_pair(&mut |a, b| {
            stats += collide_primitives(meshes, &sweep_options, a, b, handler);
        });

        log_stats(&stats);
    }

    /// Finds all the contacts happening during the step, and returns them.
    pub fn collect_events(&mut self) -> CcdEvents {
        let mut events = CcdEvents::default();
        self.collide_with(&mut events);
        events
    }

    /// Finds all the contacts happening during the step in parallel, and reports them to the
    /// given closures.
    ///
    /// Candidate pairs are collected first, then processed on the rayon thread pool. The
    /// closures may be called concurrently, in any order.
    #[cfg(feature = "parallel")]
    pub fn par_collide<F, G>(&mut self, on_tri_vert: F, on_edge_edge: G)
    where
        M: Send + Sync,
        F: Fn(TriVertCollision) + Sync,
        G: Fn(EdgeEdgeCollision) + Sync,
    {
        use rayon::prelude::*;

        let mut pairs = vec![];
        self.broad_phase
            .for_each_candidate_pair(&mut |a, b| pairs.push((a, b)));

        let meshes = &self.meshes;
        let sweep_options = self.options.sweep_options();

        let stats = pairs
            .par_iter()
            .map(|(a, b)| {
                let mut handler = CallbackHandler(&on_tri_vert, &on_edge_edge);
                collide_primitives(meshes, &sweep_options, *a, *b, &mut handler)
            })
            .reduce(CollideStats::default, |mut acc, stats| {
                acc += stats;
                acc
            });

        log_stats(&stats);
    }
}

impl<M: CcdMesh, B: BroadPhase> Drop for MeshCcd<M, B> {
    fn drop(&mut self) {
        for (_, record) in self.meshes.iter_mut() {
            if let Some(geometry) = record.geometry.take() {
                self.broad_phase.release_geometry(geometry);
            }
        }
    }
}

fn mesh_address<M>(mesh: &Arc<M>) -> usize {
    Arc::as_ptr(mesh).cast::<()>() as usize
}

fn check_delta_len<M: CcdMesh>(mesh: &M, delta: Option<&[Vector<Real>]>) -> Result<(), CcdError> {
    match delta {
        Some(delta) if delta.len() != mesh.vertices().len() => Err(CcdError::DeltaLengthMismatch {
            expected: mesh.vertices().len(),
            found: delta.len(),
        }),
        _ => Ok(()),
    }
}

fn log_stats(stats: &CollideStats) {
    log::debug!(
        "CCD processed {} candidate pairs: {} triangle-vertex and {} edge-edge contacts.",
        stats.candidate_pairs,
        stats.tri_vert,
        stats.edge_edge
    );
}

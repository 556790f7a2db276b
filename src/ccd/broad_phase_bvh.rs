use crate::bounding_volume::Aabb;
use crate::ccd::{BroadPhase, BroadPhaseError, GeometryHandle, MeshHandle, Primitive};
use crate::partitioning::{Bvh, BvhBuildStrategy, BvhWorkspace};
use slab::Slab;

#[derive(Clone, Debug)]
struct BvhGeometry {
    owner: MeshHandle,
    aabbs: Vec<Aabb>,
}

/// A broad-phase based on a [`Bvh`] rebuilt from scratch at each scene commit.
///
/// Primitives are reported as candidates when their AABBs overlap or touch.
#[derive(Clone, Debug, Default)]
pub struct BvhBroadPhase {
    strategy: BvhBuildStrategy,
    geometries: Slab<BvhGeometry>,
    num_primitives: usize,
    tree: Bvh,
    workspace: BvhWorkspace,
    // Maps a tree leaf to the primitive it bounds.
    leaves: Vec<Primitive>,
}

impl BvhBroadPhase {
    /// Creates an empty broad-phase building its tree with the given strategy.
    pub fn new(strategy: BvhBuildStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// The strategy used to build the tree.
    pub fn build_strategy(&self) -> BvhBuildStrategy {
        self.strategy
    }

    /// Sets the strategy used to build the tree at the next scene commit.
    pub fn set_build_strategy(&mut self, strategy: BvhBuildStrategy) {
        self.strategy = strategy;
    }

    /// The tree built at the last scene commit.
    pub fn tree(&self) -> &Bvh {
        &self.tree
    }

    /// The number of geometries registered into this broad-phase.
    pub fn num_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// The total number of primitives registered into this broad-phase.
    pub fn num_primitives(&self) -> usize {
        self.num_primitives
    }
}

impl BroadPhase for BvhBroadPhase {
    fn create_geometry(
        &mut self,
        owner: MeshHandle,
        primitive_count: usize,
    ) -> Result<GeometryHandle, BroadPhaseError> {
        // Tree leaves are identified by `u32`.
        let max = u32::MAX as usize;
        let requested = self.num_primitives + primitive_count;
        if requested > max {
            return Err(BroadPhaseError::CapacityExceeded { requested, max });
        }

        self.num_primitives = requested;
        let key = self.geometries.insert(BvhGeometry {
            owner,
            aabbs: vec![Aabb::new_invalid(); primitive_count],
        });
        Ok(GeometryHandle(key as u32))
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        match self.geometries.try_remove(handle.0 as usize) {
            Some(geometry) => self.num_primitives -= geometry.aabbs.len(),
            None => log::warn!("Attempted to release the unknown geometry {:?}.", handle),
        }
    }

    fn commit_geometry(&mut self, handle: GeometryHandle, bounds: &mut dyn FnMut(u32) -> Aabb) {
        let Some(geometry) = self.geometries.get_mut(handle.0 as usize) else {
            log::warn!("Attempted to commit the unknown geometry {:?}.", handle);
            return;
        };

        for (i, aabb) in geometry.aabbs.iter_mut().enumerate() {
            *aabb = bounds(i as u32);
        }
    }

    fn commit_scene(&mut self) {
        let Self {
            strategy,
            geometries,
            tree,
            workspace,
            leaves,
            ..
        } = self;

        leaves.clear();

        // Primitives that were never committed have an invalid AABB and are left out.
        let tree_leaves = geometries
            .iter()
            .flat_map(|(_, geometry)| {
                geometry
                    .aabbs
                    .iter()
                    .enumerate()
                    .map(move |(triangle, aabb)| (geometry.owner, triangle as u32, *aabb))
            })
            .filter(|(_, _, aabb)| aabb.is_valid())
            .map(|(mesh, triangle, aabb)| {
                let leaf_id = leaves.len();
                leaves.push(Primitive { mesh, triangle });
                (leaf_id, aabb)
            });

        tree.rebuild_from_iter(workspace, *strategy, tree_leaves);

        log::debug!(
            "Broad-phase tree rebuilt with {} leaves (depth {}).",
            tree.leaf_count(),
            tree.subtree_depth(0)
        );
    }

    fn for_each_candidate_pair(&mut self, f: &mut dyn FnMut(Primitive, Primitive)) {
        let leaves = &self.leaves;
        self.tree
            .traverse_bvtt_single_tree(&mut self.workspace, &mut |leaf1, leaf2| {
                f(leaves[leaf1 as usize], leaves[leaf2 as usize])
            });
    }

    fn geometry_aabbs(&self, handle: GeometryHandle) -> Option<&[Aabb]> {
        self.geometries
            .get(handle.0 as usize)
            .map(|geometry| &geometry.aabbs[..])
    }
}

use super::{Bvh, BvhNode};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;

impl Bvh {
    pub(super) fn rebuild_range_binned(&mut self, target_node_id: u32, leaves: &mut [BvhNode]) {
        // PERF: the bin count could depend on the number of leaves to split.
        //       The paper suggests (4 + 2 * sqrt(num_leaves).floor()).min(16)
        const NUM_BINS: usize = 8;
        const BIN_EPSILON: Real = 1.0e-5;

        let mut bins = [BvhBin::default(); NUM_BINS];

        assert!(leaves.len() > 1);

        let centroid_aabb = Aabb::from_points(leaves.iter().map(|node| node.center()));
        let bins_axis = centroid_aabb.extents().imax();
        let bins_range = [centroid_aabb.mins[bins_axis], centroid_aabb.maxs[bins_axis]];

        // All the centers coincide along the longest axis. No plane can separate them.
        if bins_range[1] <= bins_range[0] {
            let mid = leaves.len() / 2;
            let (left_leaves, right_leaves) = leaves.split_at_mut(mid);
            self.assign_children(
                target_node_id,
                left_leaves,
                right_leaves,
                Self::rebuild_range_binned,
            );
            return;
        }

        // Compute bins characteristics.
        let k1 = NUM_BINS as Real * (1.0 - BIN_EPSILON) / (bins_range[1] - bins_range[0]);
        let k0 = bins_range[0];
        let bin_of = |node: &BvhNode| {
            ((k1 * (node.center()[bins_axis] - k0)) as usize).min(NUM_BINS - 1)
        };

        for leaf in &*leaves {
            let bin = &mut bins[bin_of(leaf)];
            bin.aabb.merge(&leaf.aabb());
            bin.leaf_count += 1;
        }

        // Select the best splitting plane (there are NUM_BINS - 1 splitting planes) based on SAH.
        let mut right_merges = bins;
        let mut right_acc = bins[NUM_BINS - 1];

        for i in 1..NUM_BINS - 1 {
            right_acc.aabb.merge(&right_merges[NUM_BINS - 1 - i].aabb);
            right_acc.leaf_count += right_merges[NUM_BINS - 1 - i].leaf_count;
            right_merges[NUM_BINS - 1 - i] = right_acc;
        }

        let mut best_cost = Real::MAX;
        let mut best_plane = 0;
        let mut left_merge = bins[0];
        let mut best_leaf_count = 0;

        for i in 0..NUM_BINS - 1 {
            let right = &right_merges[i + 1];

            if left_merge.leaf_count != 0 && right.leaf_count != 0 {
                let cost = left_merge.cost() + right.cost();
                if cost < best_cost {
                    best_cost = cost;
                    best_plane = i;
                    best_leaf_count = left_merge.leaf_count;
                }
            }

            left_merge.aabb.merge(&bins[i + 1].aabb);
            left_merge.leaf_count += bins[i + 1].leaf_count;
        }

        // With the splitting plane selected, sort & split the leaves in place.
        let mut mid = best_leaf_count as usize;

        // In degenerate cases where all the node end up on the same bin,
        // just split the range in two.
        if mid == 0 || mid == leaves.len() {
            mid = leaves.len() / 2;
        } else {
            let mut left_id = 0;
            let mut right_id = mid;

            'outer: while left_id != mid && right_id != leaves.len() {
                while bin_of(&leaves[left_id]) <= best_plane {
                    left_id += 1;

                    if left_id == mid {
                        break 'outer;
                    }
                }

                while bin_of(&leaves[right_id]) > best_plane {
                    right_id += 1;

                    if right_id == leaves.len() {
                        break 'outer;
                    }
                }

                leaves.swap(left_id, right_id);
                left_id += 1;
                right_id += 1;
            }
        }

        let (left_leaves, right_leaves) = leaves.split_at_mut(mid);
        self.assign_children(
            target_node_id,
            left_leaves,
            right_leaves,
            Self::rebuild_range_binned,
        );
    }
}

#[derive(Copy, Clone, Debug)]
struct BvhBin {
    aabb: Aabb,
    leaf_count: u32,
}

impl BvhBin {
    // Surface area heuristic. Flat boxes (e.g. around static points) have a
    // zero volume, so the area is used instead.
    fn cost(&self) -> Real {
        self.aabb.half_area() * self.leaf_count as Real
    }
}

impl Default for BvhBin {
    fn default() -> Self {
        Self {
            aabb: Aabb::new_invalid(),
            leaf_count: 0,
        }
    }
}

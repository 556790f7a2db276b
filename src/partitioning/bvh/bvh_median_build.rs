use super::{Bvh, BvhNode};
use crate::bounding_volume::Aabb;

impl Bvh {
    pub(super) fn rebuild_range_median(&mut self, target_node_id: u32, leaves: &mut [BvhNode]) {
        assert!(leaves.len() > 1);

        let centroid_aabb = Aabb::from_points(leaves.iter().map(|node| node.center()));
        let axis = centroid_aabb.extents().imax();
        let mid = leaves.len() / 2;

        let _ = leaves.select_nth_unstable_by(mid, |a, b| {
            a.center()[axis]
                .partial_cmp(&b.center()[axis])
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let (left_leaves, right_leaves) = leaves.split_at_mut(mid);
        self.assign_children(
            target_node_id,
            left_leaves,
            right_leaves,
            Self::rebuild_range_median,
        );
    }
}

pub use bvh_tree::{Bvh, BvhBuildStrategy, BvhNode, BvhWorkspace};

mod bvh_binned_build;
mod bvh_median_build;
mod bvh_traverse_bvtt;
mod bvh_tree;

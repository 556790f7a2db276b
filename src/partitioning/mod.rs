//! Spatial partitioning tools.

pub use self::bvh::{Bvh, BvhBuildStrategy, BvhNode, BvhWorkspace};

mod bvh;

use crate::math::{Point, Real};

/// Operations the BVH needs from the volumes bounding its nodes.
pub trait BoundingVolume {
    /// The center of this bounding volume.
    fn center(&self) -> Point<Real>;

    /// Do both bounding volumes overlap? Touching volumes are considered overlapping.
    fn intersects(&self, other: &Self) -> bool;

    /// Enlarges this bounding volume so it also encloses `other`.
    fn merge(&mut self, other: &Self);

    /// The smallest bounding volume enclosing both `self` and `other`.
    fn merged(&self, other: &Self) -> Self;
}

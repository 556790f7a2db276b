//! Continuous collision tests between features moving linearly during `t ∈ [0, 1]`.
//!
//! Every test works on a bundle of four points and their four displacements. A point `i`
//! is at position `points[i] + t * deltas[i]` at time `t`. Contacts between a triangle and a
//! point, or between two edges, can only happen when the four points are coplanar, so both
//! tests start by finding the roots of the cubic polynomial giving the signed volume of the
//! tetrahedron formed by the four moving points.

pub use self::coplanarity::{coplanarity_polynomial, coplanarity_times};
pub use self::moving_edge_edge::{closest_line_parameters, moving_edge_edge, EdgeEdgeHit};
pub use self::moving_triangle_point::{barycentric_coordinates, moving_triangle_point, TriPointHit};

use crate::math::{Real, DEFAULT_EPSILON};

mod coplanarity;
mod moving_edge_edge;
mod moving_triangle_point;

/// Configuration of the continuous collision tests.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SweepOptions {
    /// Barycentric coordinates greater or equal to `-barycentric_tolerance` are accepted as
    /// being inside of the triangle. Must be positive or zero.
    pub barycentric_tolerance: Real,
    /// Closest-point parameters within `[-edge_parameter_tolerance, 1 + edge_parameter_tolerance]`
    /// are accepted as being inside of their segment. Must be positive or zero.
    pub edge_parameter_tolerance: Real,
    /// Triangles with nearly-colinear edges, and pairs of nearly-parallel edges, are considered
    /// degenerate and never collide. This is the threshold on the squared sine of the angle
    /// between the two vectors spanning the triangle (or the two edges).
    pub degeneracy_epsilon: Real,
}

impl SweepOptions {
    /// Creates a [`SweepOptions`] with the default values except for the tolerances applied
    /// to barycentric coordinates and edge parameters.
    pub fn with_tolerance(tolerance: Real) -> Self {
        Self {
            barycentric_tolerance: tolerance,
            edge_parameter_tolerance: tolerance,
            ..Default::default()
        }
    }
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            barycentric_tolerance: 0.0,
            edge_parameter_tolerance: 0.0,
            degeneracy_epsilon: DEFAULT_EPSILON,
        }
    }
}

use super::{coplanarity_times, SweepOptions};
use crate::math::{Point, Real, Vector, Vector2};

/// A contact between two moving edges.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct EdgeEdgeHit {
    /// The time of impact, in `[0, 1]`.
    pub time: Real,
    /// The parameters `(u, v)` of the contact point along each edge at the time of impact.
    ///
    /// The contact point is `a0 + u * (a1 - a0)` on the first edge and `b0 + v * (b1 - b0)` on
    /// the second edge.
    pub parameters: Vector2<Real>,
}

/// Computes the parameters `(u, v)` of the closest points between the line passing through
/// `a0, a1` and the line passing through `b0, b1`.
///
/// The closest points are `a0 + u * (a1 - a0)` and `b0 + v * (b1 - b0)`. Returns `None` if the
/// lines are parallel (or if one of the edges has a zero length), i.e., if the squared sine of
/// the angle between them is smaller than `degeneracy_epsilon`.
pub fn closest_line_parameters(
    a0: &Point<Real>,
    a1: &Point<Real>,
    b0: &Point<Real>,
    b1: &Point<Real>,
    degeneracy_epsilon: Real,
) -> Option<Vector2<Real>> {
    let da = a1 - a0;
    let db = b1 - b0;
    let diff = b0 - a0;

    let da_da = da.norm_squared();
    let da_db = da.dot(&db);
    let db_db = db.norm_squared();
    let det = da_da * db_db - da_db * da_db;

    if det <= degeneracy_epsilon * da_da * db_db {
        return None;
    }

    let da_diff = da.dot(&diff);
    let db_diff = db.dot(&diff);
    let u = (db_db * da_diff - da_db * db_diff) / det;
    let v = (da_db * da_diff - da_da * db_diff) / det;

    Some(Vector2::new(u, v))
}

/// Continuous collision test between the moving edge `points[0], points[1]` and the moving edge
/// `points[2], points[3]`.
///
/// Each point moves from `points[i]` to `points[i] + deltas[i]` during `t ∈ [0, 1]`. Returns the
/// earliest time at which both segments intersect, together with the parameters of the
/// intersection point along each segment.
pub fn moving_edge_edge(
    points: &[Point<Real>; 4],
    deltas: &[Vector<Real>; 4],
    options: &SweepOptions,
) -> Option<EdgeEdgeHit> {
    let range = -options.edge_parameter_tolerance..=1.0 + options.edge_parameter_tolerance;

    for time in coplanarity_times(points, deltas) {
        if time < 0.0 {
            continue;
        }
        if time > 1.0 {
            break;
        }

        let x = core::array::from_fn::<_, 4, _>(|i| points[i] + deltas[i] * time);
        let Some(parameters) =
            closest_line_parameters(&x[0], &x[1], &x[2], &x[3], options.degeneracy_epsilon)
        else {
            log::trace!("Parallel edges at time {time}, skipping this root.");
            continue;
        };

        if range.contains(&parameters.x) && range.contains(&parameters.y) {
            return Some(EdgeEdgeHit { time, parameters });
        }
    }

    None
}

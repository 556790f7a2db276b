use super::{coplanarity_times, SweepOptions};
use crate::math::{Point, Real, Vector};

/// A contact between a moving triangle and a moving point.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TriPointHit {
    /// The time of impact, in `[0, 1]`.
    pub time: Real,
    /// The barycentric coordinates of the point in the triangle at the time of impact.
    ///
    /// They sum to 1.
    pub barycentric: Vector<Real>,
}

/// Computes the barycentric coordinates of the projection of `pt` on the plane of `tri`.
///
/// Returns `None` if the triangle is degenerate, i.e., if the squared sine of the angle between
/// its edges `tri[1] - tri[0]` and `tri[2] - tri[0]` is smaller than `degeneracy_epsilon`.
pub fn barycentric_coordinates(
    tri: &[Point<Real>; 3],
    pt: &Point<Real>,
    degeneracy_epsilon: Real,
) -> Option<Vector<Real>> {
    let ab = tri[1] - tri[0];
    let ac = tri[2] - tri[0];
    let ap = pt - tri[0];

    let ab_ab = ab.norm_squared();
    let ab_ac = ab.dot(&ac);
    let ac_ac = ac.norm_squared();
    let det = ab_ab * ac_ac - ab_ac * ab_ac;

    if det <= degeneracy_epsilon * ab_ab * ac_ac {
        return None;
    }

    let ab_ap = ab.dot(&ap);
    let ac_ap = ac.dot(&ap);
    let u = (ac_ac * ab_ap - ab_ac * ac_ap) / det;
    let v = (ab_ab * ac_ap - ab_ac * ab_ap) / det;

    Some(Vector::new(1.0 - u - v, u, v))
}

/// Continuous collision test between the moving triangle `points[0..3]` and the moving point
/// `points[3]`.
///
/// Each point moves from `points[i]` to `points[i] + deltas[i]` during `t ∈ [0, 1]`. Returns the
/// earliest time at which the point lies on the triangle, together with its barycentric
/// coordinates.
pub fn moving_triangle_point(
    points: &[Point<Real>; 4],
    deltas: &[Vector<Real>; 4],
    options: &SweepOptions,
) -> Option<TriPointHit> {
    for time in coplanarity_times(points, deltas) {
        if time < 0.0 {
            continue;
        }
        if time > 1.0 {
            // Roots are sorted, the next ones are out of range too.
            break;
        }

        let x = core::array::from_fn::<_, 4, _>(|i| points[i] + deltas[i] * time);
        let Some(barycentric) =
            barycentric_coordinates(&[x[0], x[1], x[2]], &x[3], options.degeneracy_epsilon)
        else {
            log::trace!("Degenerate triangle at time {time}, skipping this root.");
            continue;
        };

        if barycentric.iter().all(|b| *b >= -options.barycentric_tolerance) {
            return Some(TriPointHit { time, barycentric });
        }
    }

    None
}

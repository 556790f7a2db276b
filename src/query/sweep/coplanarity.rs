use crate::math::{Point, Real, Vector};
use crate::utils::{self, PolynomialRoots};

/// Coefficients of the polynomial giving six times the signed volume of the tetrahedron
/// formed by four moving points, as a function of time.
///
/// The coefficients are given in increasing degree order.
pub fn coplanarity_polynomial(
    points: &[Point<Real>; 4],
    deltas: &[Vector<Real>; 4],
) -> [Real; 4] {
    let e0 = points[1] - points[0];
    let e1 = points[2] - points[0];
    let e2 = points[3] - points[0];

    let d0 = deltas[1] - deltas[0];
    let d1 = deltas[2] - deltas[0];
    let d2 = deltas[3] - deltas[0];

    let e0xe1 = e0.cross(&e1);
    let d0xd1 = d0.cross(&d1);
    let mixed = e0.cross(&d1) + d0.cross(&e1);

    [
        e0xe1.dot(&e2),
        d2.dot(&e0xe1) + e2.dot(&mixed),
        e2.dot(&d0xd1) + d2.dot(&mixed),
        d0xd1.dot(&d2),
    ]
}

/// The times at which the four moving points become coplanar, sorted in increasing order.
///
/// No root is returned if the points are coplanar at all times (or never coplanar).
pub fn coplanarity_times(
    points: &[Point<Real>; 4],
    deltas: &[Vector<Real>; 4],
) -> PolynomialRoots {
    utils::cubic_roots(coplanarity_polynomial(points, deltas))
}

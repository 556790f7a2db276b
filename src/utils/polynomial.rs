//! Real roots of polynomials of degree at most three.
//!
//! Coefficients are always given in increasing degree order, i.e., `coeffs[i]` multiplies
//! `t^i`. All the root-finding functions return their roots sorted in increasing order.

use crate::math::{Real, DEFAULT_EPSILON};
use arrayvec::ArrayVec;

/// The real roots of a polynomial of degree at most three.
pub type PolynomialRoots = ArrayVec<Real, 3>;

// Coefficients smaller than this (relative to the largest coefficient) are treated as zeros.
const NEGLIGIBLE_COEFF: Real = DEFAULT_EPSILON * 16.0;
const MAX_REFINEMENT_ITERATIONS: usize = 100;

/// Evaluates the polynomial `Σ coeffs[i] * t^i` using Horner's scheme.
#[inline]
pub fn eval_polynomial(coeffs: &[Real], t: Real) -> Real {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Evaluates the polynomial `Σ coeffs[i] * t^i` as well as its derivative at `t`.
#[inline]
pub fn eval_polynomial_with_derivative(coeffs: &[Real], t: Real) -> (Real, Real) {
    let mut value = 0.0;
    let mut derivative = 0.0;

    for c in coeffs.iter().rev() {
        derivative = derivative * t + value;
        value = value * t + c;
    }

    (value, derivative)
}

/// The root of the polynomial `c0 + c1 * t`.
///
/// Returns no root if `c1` is zero, even if `c0` is zero too (in which case every `t` is a root).
pub fn linear_roots(c0: Real, c1: Real) -> PolynomialRoots {
    let mut result = PolynomialRoots::new();
    if c1 != 0.0 {
        result.push(-c0 / c1);
    }
    result
}

/// The real roots of the polynomial `c0 + c1 * t + c2 * t²`, sorted in increasing order.
///
/// A double root is reported twice. If `c2` is zero, this falls back to [`linear_roots`].
pub fn quadratic_roots(c0: Real, c1: Real, c2: Real) -> PolynomialRoots {
    if c2 == 0.0 {
        return linear_roots(c0, c1);
    }

    let mut result = PolynomialRoots::new();
    let discr = c1 * c1 - 4.0 * c2 * c0;

    if discr < 0.0 {
        // Accept slightly negative discriminants as a double root, they are mostly the
        // result of rounding errors on a tangent parabola.
        if -discr <= NEGLIGIBLE_COEFF * (c1 * c1 + (4.0 * c2 * c0).abs()) {
            let root = -c1 / (2.0 * c2);
            result.push(root);
            result.push(root);
        }
        return result;
    }

    // Numerically stable formulation avoiding cancellations.
    let q = -0.5 * (c1 + c1.signum() * discr.sqrt());

    if q == 0.0 {
        // Only happens if c1 == 0 and c0 == 0.
        result.push(0.0);
        result.push(0.0);
        return result;
    }

    let r1 = q / c2;
    let r2 = c0 / q;

    if r1 <= r2 {
        result.push(r1);
        result.push(r2);
    } else {
        result.push(r2);
        result.push(r1);
    }

    result
}

/// The real roots of the polynomial `coeffs[0] + coeffs[1] * t + coeffs[2] * t² + coeffs[3] * t³`,
/// sorted in increasing order.
///
/// Leading coefficients that are negligible with respect to the largest coefficient are
/// ignored, and the polynomial is solved as a quadratic or linear polynomial instead. If all
/// the coefficients are negligible, no root is returned.
///
/// Tangent (multiple) roots are reported once.
pub fn cubic_roots(coeffs: [Real; 4]) -> PolynomialRoots {
    let scale = coeffs.iter().fold(0.0, |acc: Real, c| acc.max(c.abs()));

    if scale == 0.0 || !scale.is_finite() {
        return PolynomialRoots::new();
    }

    let [c0, c1, c2, c3] = coeffs.map(|c| c / scale);

    if c3.abs() <= NEGLIGIBLE_COEFF {
        if c2.abs() <= NEGLIGIBLE_COEFF {
            if c1.abs() <= NEGLIGIBLE_COEFF {
                return PolynomialRoots::new();
            }
            return linear_roots(c0, c1);
        }

        let mut roots = quadratic_roots(c0, c1, c2);
        dedup_sorted_roots(&mut roots);
        return roots;
    }

    // Work with the monic polynomial t³ + a t² + b t + c.
    let monic = [c0 / c3, c1 / c3, c2 / c3, 1.0];
    let bound = 1.0 + monic[0].abs().max(monic[1].abs()).max(monic[2].abs());

    // The critical points split the real line into intervals where the polynomial is monotonic.
    let mut critical_points = quadratic_roots(monic[1], 2.0 * monic[2], 3.0);
    dedup_sorted_roots(&mut critical_points);

    let mut bounds = ArrayVec::<Real, 4>::new();
    bounds.push(-bound);
    for crit in &critical_points {
        if *crit > -bound && *crit < bound {
            bounds.push(*crit);
        }
    }
    bounds.push(bound);

    let values: ArrayVec<Real, 4> = bounds.iter().map(|t| eval_polynomial(&monic, *t)).collect();

    // A critical point is a tangent root if its value vanishes up to the rounding errors of its
    // evaluation. The sign of the polynomial there is meaningless, so neither of its neighboring
    // intervals can contain another root.
    let is_tangent = |i: usize| {
        i > 0
            && i < bounds.len() - 1
            && values[i].abs() <= evaluation_error_bound(&monic, bounds[i])
    };

    let mut roots = PolynomialRoots::new();

    for i in 0..bounds.len() {
        if is_tangent(i) {
            push_root(&mut roots, bounds[i]);
        }
    }

    for i in 0..bounds.len() - 1 {
        let (f_lo, f_hi) = (values[i], values[i + 1]);

        if is_tangent(i) || is_tangent(i + 1) {
            continue;
        }

        if (f_lo < 0.0) != (f_hi < 0.0) {
            push_root(&mut roots, refine_root(&monic, bounds[i], bounds[i + 1], f_lo));
        }
    }

    roots.sort_unstable_by(|a, b| a.total_cmp(b));
    dedup_sorted_roots(&mut roots);
    roots
}

// Bound of the rounding error of the evaluation of the polynomial at `t` with Horner's scheme.
fn evaluation_error_bound(coeffs: &[Real], t: Real) -> Real {
    let magnitude = coeffs
        .iter()
        .rev()
        .fold(0.0, |acc: Real, c| acc * t.abs() + c.abs());
    NEGLIGIBLE_COEFF * magnitude
}

fn push_root(roots: &mut PolynomialRoots, root: Real) {
    if !roots.is_full() {
        roots.push(root);
    }
}

/// Finds the root of a monotonic polynomial bracketed by `[lo, hi]` with a safeguarded
/// Newton iteration falling back to bisection whenever Newton leaves the bracket.
fn refine_root(coeffs: &[Real], mut lo: Real, mut hi: Real, f_lo: Real) -> Real {
    let lo_is_negative = f_lo < 0.0;
    let mut t = (lo + hi) / 2.0;

    for _ in 0..MAX_REFINEMENT_ITERATIONS {
        let (f, df) = eval_polynomial_with_derivative(coeffs, t);

        if f == 0.0 {
            return t;
        }

        if (f < 0.0) == lo_is_negative {
            lo = t;
        } else {
            hi = t;
        }

        let newton = t - f / df;
        let next = if df != 0.0 && newton > lo && newton < hi {
            newton
        } else {
            (lo + hi) / 2.0
        };

        if (next - t).abs() <= DEFAULT_EPSILON * (1.0 + t.abs()) {
            return next;
        }

        t = next;
    }

    t
}

// Merges roots closer than the achievable precision (multiple roots found twice).
fn dedup_sorted_roots(roots: &mut PolynomialRoots) {
    let threshold = DEFAULT_EPSILON.sqrt();
    let mut i = 1;
    while i < roots.len() {
        if roots[i] - roots[i - 1] <= threshold * (1.0 + roots[i].abs()) {
            let _ = roots.remove(i);
        } else {
            i += 1;
        }
    }
}

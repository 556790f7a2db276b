//! Various unsorted geometrical and logical operators.

pub use self::polynomial::{
    cubic_roots, eval_polynomial, eval_polynomial_with_derivative, linear_roots, quadratic_roots,
    PolynomialRoots,
};
pub use self::sorted_pair::SortedPair;

pub mod hashmap;
pub mod hashset;
mod polynomial;
mod sorted_pair;

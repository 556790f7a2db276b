//! Non-persistent geometric queries.
//!
//! # General cases
//! The [`sweep`] module implements exact continuous collision tests between points and
//! triangles, and between pairs of edges, all moving linearly during a time interval `[0, 1]`.

pub use self::sweep::{
    barycentric_coordinates, closest_line_parameters, coplanarity_polynomial, coplanarity_times,
    moving_edge_edge, moving_triangle_point, EdgeEdgeHit, SweepOptions, TriPointHit,
};

pub mod sweep;

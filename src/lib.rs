/*!
meshccd
========

**meshccd** is a continuous collision detection library for deforming
triangle meshes, written with the rust programming language.

Every tracked mesh is given a per-vertex displacement for the current step.
The engine finds every triangle-vertex and edge-edge contact happening along
the linear sweep from the rest positions to the displaced positions, and
reports each of them exactly once through user-provided callbacks.

```rust
# #[cfg(feature = "f32")] {
use meshccd3d::ccd::MeshCcd;
use meshccd3d::math::{Point, Vector};
use meshccd3d::shape::TriMesh;
use std::sync::Arc;

let floor = Arc::new(TriMesh::new(
    vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    ],
    vec![[0, 1, 2]],
).unwrap());
let particle = Arc::new(TriMesh::from_points(vec![Point::new(0.2, 0.2, 1.0)]));

let mut ccd = MeshCcd::new();
ccd.attach_static(floor).unwrap();
ccd.attach(particle, Some(vec![Vector::new(0.0, 0.0, -2.0)])).unwrap();
ccd.rebuild().unwrap();

let events = ccd.collect_events();
assert_eq!(events.tri_vert.len(), 1);
# }
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![deny(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![allow(clippy::type_complexity)] // Complains about closures that are fairly simple.

#[cfg(all(feature = "f32", feature = "f64"))]
std::compile_error!("The `f32` and `f64` features are mutually exclusive.");

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[cfg_attr(test, macro_use)]
extern crate approx;
extern crate alloc;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod ccd;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Matrix3, Point3, UnitVector3, Vector2, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The matrix type.
    pub use Matrix3 as Matrix;
}

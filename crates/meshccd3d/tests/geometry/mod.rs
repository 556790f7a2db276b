mod edge_edge_crossing;
mod feature_ownership;
mod passthrough;
mod rebuild;
mod self_collision;

use meshccd3d::math::{Point, Real};
use meshccd3d::shape::TriMesh;
use std::sync::Arc;

pub fn floor_triangle() -> Arc<TriMesh> {
    Arc::new(
        TriMesh::new(
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap(),
    )
}

pub fn octahedron(scale: Real) -> Arc<TriMesh> {
    let vertices = vec![
        Point::new(scale, 0.0, 0.0),
        Point::new(-scale, 0.0, 0.0),
        Point::new(0.0, scale, 0.0),
        Point::new(0.0, -scale, 0.0),
        Point::new(0.0, 0.0, scale),
        Point::new(0.0, 0.0, -scale),
    ];
    let indices = vec![
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ];
    Arc::new(TriMesh::new(vertices, indices).unwrap())
}

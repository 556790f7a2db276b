use crate::octahedron;
use approx::assert_relative_eq;
use meshccd3d::ccd::MeshCcd;
use meshccd3d::math::{Point, Vector};
use meshccd3d::shape::TriMesh;
use std::sync::Arc;

#[test]
fn rigid_motions_never_self_collide() {
    let mut ccd = MeshCcd::new();
    let handle = ccd.attach_static(octahedron(1.0)).unwrap();
    ccd.rebuild().unwrap();
    assert!(ccd.collect_events().is_empty());

    ccd.set_delta(handle, Some(vec![Vector::new(0.5, -2.0, 1.0); 6])).unwrap();
    ccd.rebuild().unwrap();
    assert!(ccd.collect_events().is_empty());
}

#[test]
fn folding_hinge_reports_only_the_crossing_vertex() {
    // Two triangles sharing the edge (0, 1). The free vertex of the second one goes through
    // the first one.
    let hinge = Arc::new(
        TriMesh::new(
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
                Point::new(0.2, 0.2, 1.0),
            ],
            vec![[0, 1, 2], [1, 0, 3]],
        )
        .unwrap(),
    );
    let mut delta = vec![Vector::zeros(); 4];
    delta[3] = Vector::new(0.0, 0.0, -2.0);

    let mut ccd = MeshCcd::new();
    let handle = ccd.attach(hinge, Some(delta)).unwrap();
    ccd.rebuild().unwrap();

    let events = ccd.collect_events();
    assert!(events.edge_edge.is_empty());
    assert_eq!(events.tri_vert.len(), 1);

    let contact = events.tri_vert[0];
    assert_eq!(contact.tri_mesh, handle);
    assert_eq!(contact.vert_mesh, handle);
    assert_eq!(contact.tri_index, 0);
    assert_eq!(contact.vert_index, 3);
    assert_relative_eq!(contact.t, 0.5, epsilon = 1.0e-5);
    assert_relative_eq!(contact.bary, Vector::new(0.6, 0.2, 0.2), epsilon = 1.0e-5);
}

#[test]
fn planar_deformation_reports_nothing() {
    // A flat strip of triangles squashed within its own plane. All its features are coplanar
    // during the whole step, so there is no isolated time of impact.
    let vertices = vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(1.0, 1.0, 0.0),
        Point::new(0.0, 2.0, 0.0),
        Point::new(1.0, 2.0, 0.0),
    ];
    let indices = vec![[0, 1, 2], [2, 1, 3], [2, 3, 4], [4, 3, 5]];
    let strip = Arc::new(TriMesh::new(vertices, indices).unwrap());

    let delta = strip
        .vertices()
        .iter()
        .map(|pt| Vector::new(0.0, -pt.y * 0.5, 0.0))
        .collect();

    let mut ccd = MeshCcd::new();
    let _ = ccd.attach(strip, Some(delta)).unwrap();
    ccd.rebuild().unwrap();
    assert!(ccd.collect_events().is_empty());
}

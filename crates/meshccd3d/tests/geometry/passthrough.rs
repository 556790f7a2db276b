use crate::floor_triangle;
use approx::assert_relative_eq;
use meshccd3d::ccd::MeshCcd;
use meshccd3d::math::{Point, Real, Vector};
use meshccd3d::shape::TriMesh;
use std::sync::Arc;

fn particle_events(start: Point<Real>, delta: Vector<Real>) -> meshccd3d::ccd::CcdEvents {
    let mut ccd = MeshCcd::new();
    let _ = ccd.attach_static(floor_triangle()).unwrap();
    let _ = ccd
        .attach(Arc::new(TriMesh::from_points(vec![start])), Some(vec![delta]))
        .unwrap();
    ccd.rebuild().unwrap();
    ccd.collect_events()
}

#[test]
fn point_passing_through_triangle() {
    let mut ccd = MeshCcd::new();
    let floor = ccd.attach_static(floor_triangle()).unwrap();
    let particle = ccd
        .attach(
            Arc::new(TriMesh::from_points(vec![Point::new(0.2, 0.2, 1.0)])),
            Some(vec![Vector::new(0.0, 0.0, -2.0)]),
        )
        .unwrap();
    ccd.rebuild().unwrap();

    let mut tri_vert = vec![];
    let mut edge_edge = vec![];
    ccd.collide(|c| tri_vert.push(c), |c| edge_edge.push(c));

    assert!(edge_edge.is_empty());
    assert_eq!(tri_vert.len(), 1);

    let contact = tri_vert[0];
    assert_eq!(contact.tri_mesh, floor);
    assert_eq!(contact.tri_index, 0);
    assert_eq!(contact.vert_mesh, particle);
    assert_eq!(contact.vert_index, 0);
    assert_relative_eq!(contact.t, 0.5, epsilon = 1.0e-5);
    assert_relative_eq!(contact.bary, Vector::new(0.6, 0.2, 0.2), epsilon = 1.0e-5);
    assert_relative_eq!(contact.bary.sum(), 1.0, epsilon = 1.0e-5);
    // The particle comes from above the floor.
    assert_relative_eq!(*contact.normal, Vector::z(), epsilon = 1.0e-5);
}

#[test]
fn point_rising_through_triangle() {
    let events = particle_events(Point::new(0.2, 0.2, -1.0), Vector::new(0.0, 0.0, 2.0));
    assert_eq!(events.tri_vert.len(), 1);
    assert_relative_eq!(events.tri_vert[0].t, 0.5, epsilon = 1.0e-5);
    assert_relative_eq!(*events.tri_vert[0].normal, -Vector::z(), epsilon = 1.0e-5);
}

#[test]
fn point_stopping_before_triangle() {
    let events = particle_events(Point::new(0.2, 0.2, 1.0), Vector::new(0.0, 0.0, -0.5));
    assert!(events.is_empty());
}

#[test]
fn point_crossing_plane_outside_of_triangle() {
    let events = particle_events(Point::new(0.8, 0.8, 1.0), Vector::new(0.0, 0.0, -2.0));
    assert!(events.is_empty());
}

#[test]
fn still_objects_never_collide() {
    let events = particle_events(Point::new(0.2, 0.2, 1.0), Vector::zeros());
    assert!(events.is_empty());

    let events = particle_events(Point::new(0.2, 0.2, 0.5), Vector::new(0.3, -0.1, 0.0));
    assert!(events.is_empty());
}

#[test]
fn moving_triangle_hits_still_point() {
    // Same configuration as `point_passing_through_triangle`, seen from the frame of the point.
    let mut ccd = MeshCcd::new();
    let floor = ccd
        .attach(floor_triangle(), Some(vec![Vector::new(0.0, 0.0, 2.0); 3]))
        .unwrap();
    let _ = ccd
        .attach_static(Arc::new(TriMesh::from_points(vec![Point::new(0.2, 0.2, 1.0)])))
        .unwrap();
    ccd.rebuild().unwrap();

    let events = ccd.collect_events();
    assert_eq!(events.tri_vert.len(), 1);
    assert_eq!(events.tri_vert[0].tri_mesh, floor);
    assert_relative_eq!(events.tri_vert[0].t, 0.5, epsilon = 1.0e-5);
    assert_relative_eq!(events.tri_vert[0].bary, Vector::new(0.6, 0.2, 0.2), epsilon = 1.0e-5);
    // The floor moves towards the point: the normal points from the floor to the point.
    assert_relative_eq!(*events.tri_vert[0].normal, Vector::z(), epsilon = 1.0e-5);
}

use approx::assert_relative_eq;
use meshccd3d::ccd::{CcdOptions, MeshCcd};
use meshccd3d::math::{Point, Vector, Vector2};
use meshccd3d::partitioning::BvhBuildStrategy;
use meshccd3d::shape::TriMesh;
use std::sync::Arc;

/*
 * Two triangles in orthogonal planes, with their lowest and highest edges crossing:
 * - The first triangle lies on the plane y = 0 with its bottom edge along the x axis at z = 1,
 *   and moves down by 2.
 * - The second triangle lies on the plane x = 0 with its top edge along the y axis at z = 0.
 */
fn crossing_triangles() -> (Arc<TriMesh>, Arc<TriMesh>) {
    let falling = TriMesh::new(
        vec![
            Point::new(-1.0, 0.0, 1.0),
            Point::new(1.0, 0.0, 1.0),
            Point::new(0.0, 0.0, 5.0),
        ],
        vec![[0, 1, 2]],
    )
    .unwrap();
    let still = TriMesh::new(
        vec![
            Point::new(0.0, -1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, -5.0),
        ],
        vec![[0, 1, 2]],
    )
    .unwrap();

    (Arc::new(falling), Arc::new(still))
}

#[test]
fn crossing_edges_collide_once() {
    for strategy in [BvhBuildStrategy::Binned, BvhBuildStrategy::Median] {
        let (falling, still) = crossing_triangles();
        let mut ccd = MeshCcd::with_options(CcdOptions::default().with_bvh_build_strategy(strategy));
        let falling = ccd
            .attach(falling, Some(vec![Vector::new(0.0, 0.0, -2.0); 3]))
            .unwrap();
        let still = ccd.attach_static(still).unwrap();
        ccd.rebuild().unwrap();

        let events = ccd.collect_events();
        assert!(events.tri_vert.is_empty());
        assert_eq!(events.edge_edge.len(), 1);

        let contact = events.edge_edge[0];
        assert_relative_eq!(contact.t, 0.5, epsilon = 1.0e-5);
        assert_relative_eq!(contact.uv, Vector2::new(0.5, 0.5), epsilon = 1.0e-5);
        assert_eq!(contact.a_edge, [0, 1]);
        assert_eq!(contact.b_edge, [0, 1]);

        // The normal points from the first edge towards the second one, whatever the order
        // the broad-phase reported them in.
        if contact.a_mesh == falling {
            assert_eq!(contact.b_mesh, still);
            assert_relative_eq!(*contact.normal, -Vector::z(), epsilon = 1.0e-5);
        } else {
            assert_eq!((contact.a_mesh, contact.b_mesh), (still, falling));
            assert_relative_eq!(*contact.normal, Vector::z(), epsilon = 1.0e-5);
        }
    }
}

#[test]
fn edges_stopping_short_do_not_collide() {
    let (falling, still) = crossing_triangles();
    let mut ccd = MeshCcd::new();
    let _ = ccd
        .attach(falling, Some(vec![Vector::new(0.0, 0.0, -0.9); 3]))
        .unwrap();
    let _ = ccd.attach_static(still).unwrap();
    ccd.rebuild().unwrap();

    assert!(ccd.collect_events().is_empty());
}

#[test]
fn edge_tolerance_extends_segments() {
    // The top edge of the still triangle ends slightly before the x axis. Its third vertex is
    // far enough below for the falling edge to never reach the other edges.
    let still = Arc::new(
        TriMesh::new(
            vec![
                Point::new(0.0, 0.05, 0.0),
                Point::new(0.0, 2.0, 0.0),
                Point::new(0.0, -1.0, -50.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap(),
    );
    let (falling, _) = crossing_triangles();
    let delta = Some(vec![Vector::new(0.0, 0.0, -2.0); 3]);

    let mut strict = MeshCcd::new();
    let _ = strict.attach(falling.clone(), delta.clone()).unwrap();
    let _ = strict.attach_static(still.clone()).unwrap();
    strict.rebuild().unwrap();
    assert!(strict.collect_events().is_empty());

    let mut tolerant =
        MeshCcd::with_options(CcdOptions::default().with_edge_parameter_tolerance(0.1));
    let _ = tolerant.attach(falling, delta).unwrap();
    let _ = tolerant.attach_static(still).unwrap();
    tolerant.rebuild().unwrap();

    let events = tolerant.collect_events();
    assert!(events.tri_vert.is_empty());
    assert_eq!(events.edge_edge.len(), 1);
    assert_relative_eq!(events.edge_edge[0].t, 0.5, epsilon = 1.0e-5);
}

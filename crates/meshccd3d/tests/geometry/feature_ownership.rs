use crate::octahedron;
use approx::assert_relative_eq;
use meshccd3d::ccd::MeshCcd;
use meshccd3d::math::{Point, Real, Vector};
use meshccd3d::query::{moving_triangle_point, SweepOptions};
use meshccd3d::shape::{CcdMesh, TriMesh};
use std::collections::BTreeSet;
use std::sync::Arc;

#[test]
fn shared_vertex_is_reported_once() {
    // A large plate falling on the top vertex of an octahedron. This vertex is shared by four
    // triangles, all overlapping the plate.
    let plate = Arc::new(
        TriMesh::new(
            vec![
                Point::new(-3.0, -3.0, 2.0),
                Point::new(3.0, -3.0, 2.0),
                Point::new(0.0, 4.0, 2.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap(),
    );

    let mut ccd = MeshCcd::new();
    let octahedron = ccd.attach_static(octahedron(1.0)).unwrap();
    let plate = ccd
        .attach(plate, Some(vec![Vector::new(0.0, 0.0, -1.5); 3]))
        .unwrap();
    ccd.rebuild().unwrap();

    let events = ccd.collect_events();
    assert!(events.edge_edge.is_empty());
    assert_eq!(events.tri_vert.len(), 1);

    let contact = events.tri_vert[0];
    assert_eq!(contact.tri_mesh, plate);
    assert_eq!(contact.vert_mesh, octahedron);
    assert_eq!(contact.vert_index, 4);
    assert_relative_eq!(contact.t, 2.0 / 3.0, epsilon = 1.0e-5);
    assert_relative_eq!(
        contact.bary,
        Vector::new(2.0 / 7.0, 2.0 / 7.0, 3.0 / 7.0),
        epsilon = 1.0e-5
    );
    assert_relative_eq!(*contact.normal, -Vector::z(), epsilon = 1.0e-5);
}

#[test]
fn point_cloud_matches_brute_force() {
    let mut rng = oorandom::Rand32::new(1234);
    let mut rand = move |range: Real| (rng.rand_float() as Real * 2.0 - 1.0) * range;

    let shape = octahedron(1.0);
    let points: Vec<_> = (0..200)
        .map(|_| Point::new(rand(2.0), rand(2.0), rand(2.0)))
        .collect();
    let deltas: Vec<_> = (0..200)
        .map(|_| Vector::new(rand(1.5), rand(1.5), rand(1.5)))
        .collect();

    let mut expected = BTreeSet::new();
    for tri in 0..shape.num_triangles() as u32 {
        let [a, b, c] = shape.triangle_points(tri);
        for (vid, (pt, delta)) in points.iter().zip(deltas.iter()).enumerate() {
            let still = Vector::zeros();
            if moving_triangle_point(
                &[a, b, c, *pt],
                &[still, still, still, *delta],
                &SweepOptions::default(),
            )
            .is_some()
            {
                let _ = expected.insert((tri, vid as u32));
            }
        }
    }

    // The random motions are large enough for some points to cross the octahedron.
    assert!(!expected.is_empty());

    let mut ccd = MeshCcd::new();
    let shape = ccd.attach_static(shape).unwrap();
    let cloud = ccd
        .attach(Arc::new(TriMesh::from_points(points)), Some(deltas))
        .unwrap();
    ccd.rebuild().unwrap();

    let mut found = BTreeSet::new();
    let mut num_tri_vert = 0;
    ccd.collide(
        |contact| {
            assert_eq!(contact.tri_mesh, shape);
            assert_eq!(contact.vert_mesh, cloud);
            assert!(contact.bary.iter().all(|b| *b >= 0.0));
            assert_relative_eq!(contact.bary.sum(), 1.0, epsilon = 1.0e-4);
            let _ = found.insert((contact.tri_index, contact.vert_index));
            num_tri_vert += 1;
        },
        |contact| panic!("Unexpected edge-edge contact: {:?}", contact),
    );

    assert_eq!(num_tri_vert, found.len(), "a contact was reported twice");
    assert_eq!(found, expected);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_collide_matches_sequential() {
    use std::sync::Mutex;

    let mut rng = oorandom::Rand32::new(99);
    let mut rand = move || (rng.rand_float() as Real * 2.0 - 1.0) * 2.0;
    let points: Vec<_> = (0..300).map(|_| Point::new(rand(), rand(), rand())).collect();
    let deltas: Vec<_> = (0..300).map(|_| Vector::new(rand(), rand(), rand())).collect();

    let mut ccd = MeshCcd::new();
    let _ = ccd.attach_static(octahedron(1.0)).unwrap();
    let _ = ccd
        .attach(Arc::new(TriMesh::from_points(points)), Some(deltas))
        .unwrap();
    ccd.rebuild().unwrap();

    let mut expected: Vec<_> = ccd
        .collect_events()
        .tri_vert
        .iter()
        .map(|c| (c.tri_index, c.vert_index))
        .collect();
    expected.sort_unstable();

    let found = Mutex::new(vec![]);
    ccd.par_collide(
        |c| found.lock().unwrap().push((c.tri_index, c.vert_index)),
        |c| panic!("Unexpected edge-edge contact: {:?}", c),
    );
    let mut found = found.into_inner().unwrap();
    found.sort_unstable();

    assert_eq!(found, expected);
}

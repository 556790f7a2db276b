use crate::{floor_triangle, octahedron};
use meshccd3d::bounding_volume::Aabb;
use meshccd3d::ccd::{BroadPhase, GeometryHandle, MeshCcd};
use meshccd3d::math::{Point, Vector};
use meshccd3d::shape::TriMesh;
use std::sync::Arc;

fn geometry_aabbs(ccd: &MeshCcd, num_geometries: u32) -> Vec<Vec<Aabb>> {
    (0..num_geometries)
        .map(|i| {
            ccd.broad_phase()
                .geometry_aabbs(GeometryHandle(i))
                .unwrap()
                .to_vec()
        })
        .collect()
}

#[test]
fn repeated_rebuilds_give_the_same_contacts() {
    let mut ccd = MeshCcd::new();
    let _ = ccd.attach_static(floor_triangle()).unwrap();
    let _ = ccd.attach_static(octahedron(0.5)).unwrap();
    let _ = ccd
        .attach(
            Arc::new(TriMesh::from_points(vec![
                Point::new(0.2, 0.2, 1.0),
                Point::new(0.1, 0.6, 1.0),
            ])),
            Some(vec![Vector::new(0.0, 0.0, -2.0); 2]),
        )
        .unwrap();

    ccd.rebuild().unwrap();
    let first = ccd.collect_events();
    let first_aabbs = geometry_aabbs(&ccd, 3);
    assert!(!first.is_empty());

    // Collecting twice without modifying anything doesn’t need a rebuild.
    assert_eq!(ccd.collect_events(), first);

    ccd.rebuild().unwrap();
    assert_eq!(geometry_aabbs(&ccd, 3), first_aabbs);

    // Recomputing the bounds of unchanged meshes gives the same boxes.
    let handles: Vec<_> = ccd.iter_handles().collect();
    for handle in handles {
        ccd.mark_dirty(handle).unwrap();
    }
    ccd.rebuild().unwrap();
    assert_eq!(geometry_aabbs(&ccd, 3), first_aabbs);
    let mut second = ccd.collect_events();

    let mut first = first;
    let sort = |events: &mut meshccd3d::ccd::CcdEvents| {
        events
            .tri_vert
            .sort_by_key(|c| (c.tri_mesh, c.tri_index, c.vert_mesh, c.vert_index));
        events
            .edge_edge
            .sort_by_key(|c| (c.a_mesh, c.a_edge, c.b_mesh, c.b_edge));
    };
    sort(&mut first);
    sort(&mut second);
    assert_eq!(first, second);
}

#[test]
fn rebuild_commits_dirty_meshes_only() {
    let mut ccd = MeshCcd::new();
    let floor = ccd.attach_static(floor_triangle()).unwrap();
    let particle = ccd
        .attach(
            Arc::new(TriMesh::from_points(vec![Point::new(0.2, 0.2, 1.0)])),
            None,
        )
        .unwrap();

    assert!(ccd.is_dirty(floor).unwrap());
    ccd.rebuild().unwrap();
    assert!(!ccd.is_dirty(floor).unwrap());
    assert!(!ccd.is_dirty(particle).unwrap());
    assert!(ccd.collect_events().is_empty());

    // Changing the displacement flags the mesh, and the swept boxes follow at the next rebuild.
    ccd.set_delta(particle, Some(vec![Vector::new(0.0, 0.0, -2.0)])).unwrap();
    assert!(ccd.is_dirty(particle).unwrap());
    assert!(!ccd.is_dirty(floor).unwrap());
    ccd.rebuild().unwrap();
    assert_eq!(ccd.collect_events().tri_vert.len(), 1);

    let broad_phase = ccd.broad_phase();
    assert_eq!(broad_phase.num_geometries(), 2);
    assert_eq!(broad_phase.num_primitives(), 2);
    assert_eq!(broad_phase.tree().leaf_count(), 2);

    // Back to a still particle.
    *ccd.delta_mut(particle).unwrap() = None;
    ccd.rebuild().unwrap();
    assert!(ccd.collect_events().is_empty());
}

#[test]
fn moved_vertices_are_taken_into_account_after_mark_dirty() {
    let mut ccd = MeshCcd::new();
    let _ = ccd.attach_static(floor_triangle()).unwrap();
    let particle = ccd
        .attach(
            Arc::new(TriMesh::from_points(vec![Point::new(5.0, 5.0, 1.0)])),
            Some(vec![Vector::new(0.0, 0.0, -2.0)]),
        )
        .unwrap();
    ccd.rebuild().unwrap();
    assert!(ccd.collect_events().is_empty());

    ccd.mesh_mut(particle).unwrap().vertices_mut()[0] = Point::new(0.2, 0.2, 1.0);
    ccd.rebuild().unwrap();
    assert_eq!(ccd.collect_events().tri_vert.len(), 1);

    // The swept box of the particle spans its whole motion.
    let root_aabb = ccd.broad_phase().tree().root_aabb();
    assert_eq!(root_aabb.mins, Point::new(0.0, 0.0, -1.0));
    assert_eq!(root_aabb.maxs, Point::new(1.0, 1.0, 1.0));
}

#[test]
fn detached_meshes_leave_the_broad_phase() {
    let mut ccd = MeshCcd::new();
    let floor = ccd.attach_static(floor_triangle()).unwrap();
    let _ = ccd
        .attach(
            Arc::new(TriMesh::from_points(vec![Point::new(0.2, 0.2, 1.0)])),
            Some(vec![Vector::new(0.0, 0.0, -2.0)]),
        )
        .unwrap();
    ccd.rebuild().unwrap();
    assert_eq!(ccd.collect_events().len(), 1);

    let _ = ccd.detach(floor).unwrap();
    ccd.rebuild().unwrap();
    assert!(ccd.collect_events().is_empty());
    assert_eq!(ccd.broad_phase().num_geometries(), 1);
    assert_eq!(ccd.broad_phase().num_primitives(), 1);

    let any_geometry = meshccd3d::ccd::GeometryHandle(0);
    assert!(ccd.broad_phase().geometry_aabbs(any_geometry).is_none());
}

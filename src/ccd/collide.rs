//! Narrow-phase dispatch of a pair of candidate triangles.

use crate::ccd::tracked_mesh::TrackedMesh;
use crate::ccd::{CcdEventHandler, EdgeEdgeCollision, MeshHandle, Primitive, TriVertCollision};
use crate::math::{Point, Real, UnitVector, Vector};
use crate::query::{moving_edge_edge, moving_triangle_point, EdgeEdgeHit, SweepOptions};
use crate::shape::CcdMesh;
use slab::Slab;

/// The number of contacts found while processing some candidate pairs.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct CollideStats {
    pub candidate_pairs: usize,
    pub tri_vert: usize,
    pub edge_edge: usize,
}

impl core::ops::AddAssign for CollideStats {
    fn add_assign(&mut self, rhs: Self) {
        self.candidate_pairs += rhs.candidate_pairs;
        self.tri_vert += rhs.tri_vert;
        self.edge_edge += rhs.edge_edge;
    }
}

/// Runs every triangle-vertex and edge-edge test between two candidate triangles.
///
/// Each vertex and edge is only tested through the triangle owning it, and features shared by
/// both triangles (when they belong to the same mesh) are skipped.
pub(crate) fn collide_primitives<M: CcdMesh>(
    meshes: &Slab<TrackedMesh<M>>,
    options: &SweepOptions,
    a: Primitive,
    b: Primitive,
    handler: &mut impl CcdEventHandler,
) -> CollideStats {
    let mut stats = CollideStats {
        candidate_pairs: 1,
        ..Default::default()
    };

    if a == b {
        return stats;
    }

    let (Some(mesh_a), Some(mesh_b)) = (meshes.get(a.mesh.index()), meshes.get(b.mesh.index()))
    else {
        log::trace!("Skipping the candidate pair {a:?}, {b:?} referencing a detached mesh.");
        return stats;
    };

    let tri_a = Feature::new(mesh_a, a);
    let tri_b = Feature::new(mesh_b, b);

    stats.tri_vert += tri_vert_phase(&tri_a, &tri_b, options, handler);
    stats.tri_vert += tri_vert_phase(&tri_b, &tri_a, options, handler);
    stats.edge_edge += edge_edge_phase(&tri_a, &tri_b, options, handler);
    stats
}

/// A triangle of a tracked mesh with its vertices resolved.
struct Feature<'a, M> {
    record: &'a TrackedMesh<M>,
    primitive: Primitive,
    idx: [u32; 3],
    points: [Point<Real>; 3],
    deltas: [Vector<Real>; 3],
}

impl<'a, M: CcdMesh> Feature<'a, M> {
    fn new(record: &'a TrackedMesh<M>, primitive: Primitive) -> Self {
        let idx = record.triangle(primitive.triangle);
        Self {
            record,
            primitive,
            idx,
            points: idx.map(|vid| record.position(vid)),
            deltas: idx.map(|vid| record.displacement(vid)),
        }
    }

    #[inline]
    fn mesh(&self) -> MeshHandle {
        self.primitive.mesh
    }

    // Triangles with repeated indices (e.g. the points of a point cloud) never have an area.
    #[inline]
    fn is_degenerate(&self) -> bool {
        self.idx[0] == self.idx[1] || self.idx[1] == self.idx[2] || self.idx[2] == self.idx[0]
    }

    #[inline]
    fn edge(&self, k: usize) -> [usize; 2] {
        [k, (k + 1) % 3]
    }
}

fn tri_vert_phase<M: CcdMesh>(
    tri: &Feature<M>,
    vert: &Feature<M>,
    options: &SweepOptions,
    handler: &mut impl CcdEventHandler,
) -> usize {
    if tri.is_degenerate() {
        return 0;
    }

    let same_mesh = tri.mesh() == vert.mesh();
    let owned = vert.record.ownership.triangle_vertices(vert.primitive.triangle);
    let mut num_hits = 0;

    for k in owned.corners() {
        let vid = vert.idx[k];

        if same_mesh && tri.idx.contains(&vid) {
            continue;
        }

        let points = [tri.points[0], tri.points[1], tri.points[2], vert.points[k]];
        let deltas = [tri.deltas[0], tri.deltas[1], tri.deltas[2], vert.deltas[k]];

        let Some(hit) = moving_triangle_point(&points, &deltas, options) else {
            continue;
        };

        let x = core::array::from_fn::<_, 3, _>(|i| points[i] + deltas[i] * hit.time);
        let normal = (x[1] - x[0]).cross(&(x[2] - x[0]));
        let tri_velocity = deltas[0] * hit.barycentric.x
            + deltas[1] * hit.barycentric.y
            + deltas[2] * hit.barycentric.z;

        let Some(normal) = oriented_normal(normal, tri_velocity - deltas[3]) else {
            log::trace!("Degenerate triangle-vertex normal at time {}.", hit.time);
            continue;
        };

        handler.handle_tri_vert(TriVertCollision {
            tri_mesh: tri.mesh(),
            tri_index: tri.primitive.triangle,
            vert_mesh: vert.mesh(),
            vert_index: vid,
            t: hit.time,
            bary: hit.barycentric,
            normal,
        });
        num_hits += 1;
    }

    num_hits
}

fn edge_edge_phase<M: CcdMesh>(
    a: &Feature<M>,
    b: &Feature<M>,
    options: &SweepOptions,
    handler: &mut impl CcdEventHandler,
) -> usize {
    let same_mesh = a.mesh() == b.mesh();
    let owned_a = a.record.ownership.triangle_edges(a.primitive.triangle);
    let owned_b = b.record.ownership.triangle_edges(b.primitive.triangle);
    let mut num_hits = 0;

    for ka in owned_a.corners() {
        let [ia0, ia1] = a.edge(ka);
        let a_edge = [a.idx[ia0], a.idx[ia1]];

        if a_edge[0] == a_edge[1] {
            continue;
        }

        for kb in owned_b.corners() {
            let [ib0, ib1] = b.edge(kb);
            let b_edge = [b.idx[ib0], b.idx[ib1]];

            if b_edge[0] == b_edge[1]
                || (same_mesh && (b_edge.contains(&a_edge[0]) || b_edge.contains(&a_edge[1])))
            {
                continue;
            }

            let points = [a.points[ia0], a.points[ia1], b.points[ib0], b.points[ib1]];
            let deltas = [a.deltas[ia0], a.deltas[ia1], b.deltas[ib0], b.deltas[ib1]];

            let Some(hit) = moving_edge_edge(&points, &deltas, options) else {
                continue;
            };

            let Some(normal) = edge_edge_normal(&points, &deltas, &hit, options.degeneracy_epsilon)
            else {
                log::trace!("Degenerate edge-edge normal at time {}.", hit.time);
                continue;
            };

            handler.handle_edge_edge(EdgeEdgeCollision {
                a_mesh: a.mesh(),
                b_mesh: b.mesh(),
                a_edge,
                b_edge,
                t: hit.time,
                uv: hit.parameters,
                normal,
            });
            num_hits += 1;
        }
    }

    num_hits
}

/// The normal of an edge-edge contact, oriented from the first edge towards the second one.
///
/// This is the cross product of the edge directions at rest. Edges parallel at rest use the
/// plane containing the first edge and the origin of the second one instead, and edges collinear
/// at rest use their directions at the time of impact.
fn edge_edge_normal(
    points: &[Point<Real>; 4],
    deltas: &[Vector<Real>; 4],
    hit: &EdgeEdgeHit,
    degeneracy_epsilon: Real,
) -> Option<UnitVector<Real>> {
    let da = points[1] - points[0];
    let db = points[3] - points[2];
    let dab = points[2] - points[0];

    let at_impact = core::array::from_fn::<_, 4, _>(|i| points[i] + deltas[i] * hit.time);
    let da_impact = at_impact[1] - at_impact[0];
    let db_impact = at_impact[3] - at_impact[2];

    let candidates = [
        (da.cross(&db), da.norm_squared() * db.norm_squared()),
        (da.cross(&dab), da.norm_squared() * dab.norm_squared()),
        (
            da_impact.cross(&db_impact),
            da_impact.norm_squared() * db_impact.norm_squared(),
        ),
    ];
    let normal = candidates
        .iter()
        .find(|(normal, scale)| normal.norm_squared() > degeneracy_epsilon * scale)
        .map(|(normal, _)| *normal)?;

    let a_velocity = deltas[0].lerp(&deltas[1], hit.parameters.x);
    let b_velocity = deltas[2].lerp(&deltas[3], hit.parameters.y);
    oriented_normal(normal, a_velocity - b_velocity)
}

/// Flips `normal` so it points along `relative_velocity`, and normalizes it.
///
/// If both are orthogonal, `normal` is kept as-is.
fn oriented_normal(
    normal: Vector<Real>,
    relative_velocity: Vector<Real>,
) -> Option<UnitVector<Real>> {
    let normal = if normal.dot(&relative_velocity) < 0.0 {
        -normal
    } else {
        normal
    };

    UnitVector::try_new(normal, 0.0)
}

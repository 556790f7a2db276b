use crate::ccd::MeshHandle;
use crate::math::{Real, UnitVector, Vector, Vector2};

/// A contact between a triangle and a vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TriVertCollision {
    /// The mesh containing the triangle.
    pub tri_mesh: MeshHandle,
    /// The index of the triangle in its mesh.
    pub tri_index: u32,
    /// The mesh containing the vertex.
    pub vert_mesh: MeshHandle,
    /// The index of the vertex in its mesh.
    pub vert_index: u32,
    /// The fraction of the step, in `[0, 1]`, at which the contact happens.
    pub t: Real,
    /// The barycentric coordinates of the vertex on the triangle at the time of impact.
    pub bary: Vector<Real>,
    /// The contact normal.
    ///
    /// This is the normal of the triangle at the time of impact, oriented towards the side the
    /// vertex comes from (relative to the triangle).
    pub normal: UnitVector<Real>,
}

/// A contact between two edges.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct EdgeEdgeCollision {
    /// The mesh containing the first edge.
    pub a_mesh: MeshHandle,
    /// The mesh containing the second edge.
    pub b_mesh: MeshHandle,
    /// The vertex indices of the first edge.
    pub a_edge: [u32; 2],
    /// The vertex indices of the second edge.
    pub b_edge: [u32; 2],
    /// The fraction of the step, in `[0, 1]`, at which the contact happens.
    pub t: Real,
    /// The parameters of the contact point along the first edge (`uv.x`) and the second
    /// edge (`uv.y`).
    pub uv: Vector2<Real>,
    /// The contact normal, oriented from the first edge towards the second edge.
    pub normal: UnitVector<Real>,
}

/// Trait implemented by structures responsible for handling the contacts found by
/// [`MeshCcd::collide_with`](crate::ccd::MeshCcd::collide_with).
pub trait CcdEventHandler {
    /// Handle a triangle-vertex contact.
    fn handle_tri_vert(&mut self, collision: TriVertCollision);
    /// Handle an edge-edge contact.
    fn handle_edge_edge(&mut self, collision: EdgeEdgeCollision);
}

impl CcdEventHandler for () {
    fn handle_tri_vert(&mut self, _: TriVertCollision) {}
    fn handle_edge_edge(&mut self, _: EdgeEdgeCollision) {}
}

/// All the contacts found by a collision-detection pass.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CcdEvents {
    /// The triangle-vertex contacts.
    pub tri_vert: Vec<TriVertCollision>,
    /// The edge-edge contacts.
    pub edge_edge: Vec<EdgeEdgeCollision>,
}

impl CcdEvents {
    /// The total number of contacts.
    pub fn len(&self) -> usize {
        self.tri_vert.len() + self.edge_edge.len()
    }

    /// Is there no contact at all?
    pub fn is_empty(&self) -> bool {
        self.tri_vert.is_empty() && self.edge_edge.is_empty()
    }

    /// Removes all the contacts while keeping the allocated memory.
    pub fn clear(&mut self) {
        self.tri_vert.clear();
        self.edge_edge.clear();
    }

    /// The earliest time of impact among all the contacts, if any.
    pub fn earliest_time(&self) -> Option<Real> {
        self.tri_vert
            .iter()
            .map(|c| c.t)
            .chain(self.edge_edge.iter().map(|c| c.t))
            .min_by(|a, b| a.total_cmp(b))
    }
}

impl CcdEventHandler for CcdEvents {
    fn handle_tri_vert(&mut self, collision: TriVertCollision) {
        self.tri_vert.push(collision);
    }

    fn handle_edge_edge(&mut self, collision: EdgeEdgeCollision) {
        self.edge_edge.push(collision);
    }
}

/// Forwards the contacts to a pair of closures.
pub(crate) struct CallbackHandler<F, G>(pub F, pub G);

impl<F, G> CcdEventHandler for CallbackHandler<F, G>
where
    F: FnMut(TriVertCollision),
    G: FnMut(EdgeEdgeCollision),
{
    #[inline]
    fn handle_tri_vert(&mut self, collision: TriVertCollision) {
        (self.0)(collision)
    }

    #[inline]
    fn handle_edge_edge(&mut self, collision: EdgeEdgeCollision) {
        (self.1)(collision)
    }
}

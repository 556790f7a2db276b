use crate::utils::hashset::HashSet;
use crate::utils::SortedPair;

#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// A subset of the three corners of a triangle.
///
/// For vertex ownership, bit `k` refers to the `k`-th vertex of the triangle. For edge
/// ownership, bit `k` refers to the edge going from the `k`-th vertex to the `(k + 1) % 3`-th
/// vertex.
pub struct FeatureMask(u8);

bitflags::bitflags! {
    impl FeatureMask: u8 {
        /// The first corner.
        const CORNER_0 = 1;
        /// The second corner.
        const CORNER_1 = 1 << 1;
        /// The third corner.
        const CORNER_2 = 1 << 2;
    }
}

impl FeatureMask {
    /// The mask containing only the `k`-th corner.
    #[inline]
    pub fn corner(k: usize) -> Self {
        debug_assert!(k < 3);
        Self::from_bits_truncate(1 << k)
    }

    /// Does this mask contain the `k`-th corner?
    #[inline]
    pub fn has_corner(self, k: usize) -> bool {
        self.contains(Self::corner(k))
    }

    /// Iterates through the corners contained by this mask.
    pub fn corners(self) -> impl Iterator<Item = usize> {
        (0..3).filter(move |k| self.has_corner(*k))
    }
}

/// Assignment of every vertex and every edge of a mesh to exactly one of its triangles.
///
/// Adjacent triangles share vertices and edges. Testing a feature only through the triangle
/// owning it ensures that each contact is reported once. Ownership is given to the first
/// triangle (in index buffer order) containing the feature, which also handles non-manifold
/// meshes deterministically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MeshOwnership {
    edges: Vec<FeatureMask>,
    vertices: Vec<FeatureMask>,
}

impl MeshOwnership {
    /// Computes the ownership of the features of the mesh with the given index buffer.
    ///
    /// All the indices must be smaller than `num_vertices`.
    pub fn new(indices: &[[u32; 3]], num_vertices: usize) -> Self {
        let mut seen_edges = HashSet::with_capacity(indices.len() * 3 / 2);
        let mut seen_vertices = vec![false; num_vertices];

        let edges = indices
            .iter()
            .map(|idx| {
                let mut mask = FeatureMask::empty();
                for k in 0..3 {
                    if seen_edges.insert(SortedPair::new(idx[k], idx[(k + 1) % 3])) {
                        mask |= FeatureMask::corner(k);
                    }
                }
                mask
            })
            .collect();

        let vertices = indices
            .iter()
            .map(|idx| {
                let mut mask = FeatureMask::empty();
                for (k, vid) in idx.iter().enumerate() {
                    let seen = &mut seen_vertices[*vid as usize];
                    if !*seen {
                        *seen = true;
                        mask |= FeatureMask::corner(k);
                    }
                }
                mask
            })
            .collect();

        Self { edges, vertices }
    }

    /// The edges owned by each triangle.
    #[inline]
    pub fn edges(&self) -> &[FeatureMask] {
        &self.edges
    }

    /// The vertices owned by each triangle.
    #[inline]
    pub fn vertices(&self) -> &[FeatureMask] {
        &self.vertices
    }

    /// The edges owned by the `i`-th triangle.
    #[inline]
    pub fn triangle_edges(&self, i: u32) -> FeatureMask {
        self.edges[i as usize]
    }

    /// The vertices owned by the `i`-th triangle.
    #[inline]
    pub fn triangle_vertices(&self, i: u32) -> FeatureMask {
        self.vertices[i as usize]
    }

    /// The number of triangles this ownership was computed for.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.edges.len()
    }
}

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;

const TRAVERSAL_STACK_SIZE: usize = 32;

/// The strategy for one-time build of the tree.
///
/// For general-purpose usage [`BvhBuildStrategy::Binned`] is recommended.
#[derive(Default, Clone, Debug, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BvhBuildStrategy {
    /// The tree is built using the binned strategy.
    ///
    /// This implements the strategy from "On fast Construction of SAH-based Bounding Volume Hierarchies", Ingo Ward.
    #[default]
    Binned,
    /// Each node is split at the median of the leaf centers along its largest axis.
    ///
    /// Faster to build than [`BvhBuildStrategy::Binned`], but usually results in more
    /// overlap tests during traversals.
    Median,
}

/// Workspace data for various operations on the tree.
///
/// This is all temporary data that can be freed at any time without affecting results.
/// The main reason to reuse the same instance of this over time is to lower costs of internal
/// allocations.
#[derive(Clone, Default, Debug)]
pub struct BvhWorkspace {
    pub(super) rebuild_leaves: Vec<BvhNode>,
    pub(super) traversal_stack: SmallVec<[u32; TRAVERSAL_STACK_SIZE]>,
}

/// A pair of tree nodes.
///
/// Both `left` and `right` are guaranteed to be valid except for the only special-case where the
/// tree contains only a single leaf, in which case only `left` is valid.
#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub(super) struct BvhNodeWide {
    pub(super) left: BvhNode,
    pub(super) right: BvhNode,
}

impl BvhNodeWide {
    #[inline(always)]
    pub(super) fn zeros() -> Self {
        Self {
            left: BvhNode::zeros(),
            right: BvhNode::zeros(),
        }
    }

    /// Merges both nodes contained by `self` to form its parent.
    pub(super) fn merged(&self, my_id: u32) -> BvhNode {
        self.left.merged(&self.right, my_id)
    }

    /// The sum of leaves contained by both nodes in `self`.
    pub(super) fn leaf_count(&self) -> u32 {
        self.left.leaf_count + self.right.leaf_count
    }
}

/// The node (internal or leaf) of a BVH.
#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub struct BvhNode {
    /// Mins coordinates of the node’s bounding volume.
    pub(super) mins: Point<Real>,
    /// Children of this node. A node has either 0 (i.e. it’s a leaf) or 2 children.
    ///
    /// If [`Self::leaf_count`] is 1, then the node has 0 children and this is the leaf data.
    pub(super) children: u32,
    /// Maxs coordinates of this node’s bounding volume.
    pub(super) maxs: Point<Real>,
    /// Number of leaves in the subtree rooted at this node.
    pub(super) leaf_count: u32,
}

impl BvhNode {
    #[inline(always)]
    pub(super) fn zeros() -> Self {
        Self {
            mins: Point::origin(),
            children: 0,
            maxs: Point::origin(),
            leaf_count: 0,
        }
    }

    /// Initialized a leaf.
    #[inline(always)]
    pub fn leaf(aabb: Aabb, leaf_data: u32) -> BvhNode {
        Self {
            mins: aabb.mins,
            maxs: aabb.maxs,
            children: leaf_data,
            leaf_count: 1,
        }
    }

    /// If this node is a leaf, returns its associated index provided at construction time.
    #[inline(always)]
    pub fn leaf_data(&self) -> Option<u32> {
        self.is_leaf().then_some(self.children)
    }

    /// Is this node a leaf?
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.leaf_count == 1
    }

    #[inline(always)]
    pub(super) fn merged(&self, other: &Self, children: u32) -> Self {
        Self {
            mins: self.mins.inf(&other.mins),
            children,
            maxs: self.maxs.sup(&other.maxs),
            leaf_count: self.leaf_count + other.leaf_count,
        }
    }

    /// This node’s AABB.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            mins: self.mins,
            maxs: self.maxs,
        }
    }

    /// The center of this node’s AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// Checks if the AABB of `self` intersects the `other` node’s AABB.
    ///
    /// Touching AABBs are considered intersecting.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }
}

#[derive(Clone, Debug, Default)]
pub(super) struct BvhNodeVec(pub(super) Vec<BvhNodeWide>);

impl core::ops::Deref for BvhNodeVec {
    type Target = Vec<BvhNodeWide>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl core::ops::DerefMut for BvhNodeVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Index<usize> for BvhNodeVec {
    type Output = BvhNodeWide;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for BvhNodeVec {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

/// A Bounding Volume Hierarchy designed for broad-phase pair enumeration.
///
/// The tree is rebuilt from scratch from its leaves. The leaf data (typically the index of a
/// primitive) given at construction time is returned by traversals.
#[derive(Clone, Debug, Default)]
pub struct Bvh {
    pub(super) nodes: BvhNodeVec,
}

impl Bvh {
    /// An empty BVH.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new BVH with a slice of AABBs.
    ///
    /// Each leaf will be associated an index equal to its position into the slice. For example,
    /// the AABB `leaves[42]` is associated to the leaf with index 42.
    pub fn from_leaves(strategy: BvhBuildStrategy, leaves: &[Aabb]) -> Self {
        Self::from_iter(strategy, leaves.iter().copied().enumerate())
    }

    /// Creates a new BVH with leaves given by an iterator.
    ///
    /// The iterator yields leaf index and aabbs. The leaf indices will then be read back
    /// by tree traversals.
    pub fn from_iter<It>(strategy: BvhBuildStrategy, leaves: It) -> Self
    where
        It: IntoIterator<Item = (usize, Aabb)>,
    {
        let mut result = Self::new();
        let mut workspace = BvhWorkspace::default();
        result.rebuild_from_iter(&mut workspace, strategy, leaves);
        result
    }

    /// Replaces all the leaves of this tree by the ones yielded by `leaves`, and rebuilds it.
    ///
    /// The `workspace` is used to avoid re-allocating temporary buffers at each rebuild.
    pub fn rebuild_from_iter<It>(
        &mut self,
        workspace: &mut BvhWorkspace,
        strategy: BvhBuildStrategy,
        leaves: It,
    ) where
        It: IntoIterator<Item = (usize, Aabb)>,
    {
        workspace.rebuild_leaves.clear();
        workspace.rebuild_leaves.extend(
            leaves
                .into_iter()
                .map(|(leaf_id, leaf_aabb)| BvhNode::leaf(leaf_aabb, leaf_id as u32)),
        );

        self.nodes.clear();

        // Handle special cases that don’t play well with the rebuilds.
        match workspace.rebuild_leaves.len() {
            0 => {}
            1 => {
                self.nodes.push(BvhNodeWide {
                    left: workspace.rebuild_leaves[0],
                    right: BvhNode::zeros(),
                });
            }
            2 => {
                self.nodes.push(BvhNodeWide {
                    left: workspace.rebuild_leaves[0],
                    right: workspace.rebuild_leaves[1],
                });
            }
            num_leaves => {
                self.nodes.reserve(num_leaves);
                self.nodes.push(BvhNodeWide::zeros());

                match strategy {
                    BvhBuildStrategy::Binned => {
                        self.rebuild_range_binned(0, &mut workspace.rebuild_leaves)
                    }
                    BvhBuildStrategy::Median => {
                        self.rebuild_range_median(0, &mut workspace.rebuild_leaves)
                    }
                }
            }
        }
    }

    /// Assigns the leaves of a sub-range to the `target_node_id` wide node, recursing with
    /// `split` on any side containing more than one leaf.
    pub(super) fn assign_children(
        &mut self,
        target_node_id: u32,
        left_leaves: &mut [BvhNode],
        right_leaves: &mut [BvhNode],
        split: fn(&mut Self, u32, &mut [BvhNode]),
    ) {
        assert!(!left_leaves.is_empty() && !right_leaves.is_empty());

        if left_leaves.len() == 1 {
            self.nodes[target_node_id as usize].left = left_leaves[0];
        } else {
            let left_id = self.nodes.len() as u32;
            self.nodes.push(BvhNodeWide::zeros());
            split(self, left_id, left_leaves);
            self.nodes[target_node_id as usize].left = self.nodes[left_id as usize].merged(left_id);
        }

        if right_leaves.len() == 1 {
            self.nodes[target_node_id as usize].right = right_leaves[0];
        } else {
            let right_id = self.nodes.len() as u32;
            self.nodes.push(BvhNodeWide::zeros());
            split(self, right_id, right_leaves);
            self.nodes[target_node_id as usize].right =
                self.nodes[right_id as usize].merged(right_id);
        }
    }

    /// The AABB bounding everything contained by this BVH.
    pub fn root_aabb(&self) -> Aabb {
        match self.leaf_count() {
            0 => Aabb::new_invalid(),
            1 => self.nodes[0].left.aabb(),
            _ => self.nodes[0]
                .left
                .aabb()
                .merged(&self.nodes[0].right.aabb()),
        }
    }

    /// Does this tree not contain any leaf?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of leaves of this tree.
    pub fn leaf_count(&self) -> u32 {
        if self.nodes.is_empty() {
            0
        } else {
            self.nodes[0].leaf_count()
        }
    }

    /// Iterates through all the leaves of this tree, in no particular order.
    pub fn leaves(&self) -> impl Iterator<Item = &BvhNode> + '_ {
        self.nodes
            .iter()
            .flat_map(|node| [&node.left, &node.right])
            .filter(|node| node.is_leaf())
    }

    /// The depth of the sub-tree rooted at the node with index `node_id`.
    ///
    /// Set `node_id` to 0 to get the depth of the whole tree.
    pub fn subtree_depth(&self, node_id: u32) -> u32 {
        if node_id == 0 && self.nodes.is_empty() {
            return 0;
        } else if node_id == 0 && self.nodes.len() == 1 {
            return 1 + (self.nodes[0].right.leaf_count != 0) as u32;
        }

        let node = &self.nodes[node_id as usize];

        let left_depth = if node.left.is_leaf() {
            1
        } else {
            self.subtree_depth(node.left.children)
        };

        let right_depth = if node.right.is_leaf() {
            1
        } else {
            self.subtree_depth(node.right.children)
        };

        left_depth.max(right_depth) + 1
    }
}

use crate::math::{Real, DEFAULT_EPSILON};
use crate::partitioning::BvhBuildStrategy;
use crate::query::SweepOptions;

/// Configuration of the [`MeshCcd`](crate::ccd::MeshCcd) engine.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CcdOptions {
    /// Barycentric coordinates greater or equal to `-barycentric_tolerance` are accepted as
    /// being inside of the triangle during triangle-vertex tests.
    pub barycentric_tolerance: Real,
    /// Edge parameters within `[-edge_parameter_tolerance, 1 + edge_parameter_tolerance]` are
    /// accepted as being inside of their edge during edge-edge tests.
    pub edge_parameter_tolerance: Real,
    /// Threshold below which triangles and pairs of edges are considered degenerate.
    ///
    /// See [`SweepOptions::degeneracy_epsilon`].
    pub degeneracy_epsilon: Real,
    /// The strategy used by the [`BvhBroadPhase`](crate::ccd::BvhBroadPhase) to build its tree.
    pub bvh_build_strategy: BvhBuildStrategy,
}

impl Default for CcdOptions {
    fn default() -> Self {
        Self {
            barycentric_tolerance: 0.0,
            edge_parameter_tolerance: 0.0,
            degeneracy_epsilon: DEFAULT_EPSILON,
            bvh_build_strategy: BvhBuildStrategy::default(),
        }
    }
}

impl CcdOptions {
    /// Sets the tolerance applied to barycentric coordinates.
    #[must_use]
    pub fn with_barycentric_tolerance(mut self, tolerance: Real) -> Self {
        self.barycentric_tolerance = tolerance;
        self
    }

    /// Sets the tolerance applied to edge parameters.
    #[must_use]
    pub fn with_edge_parameter_tolerance(mut self, tolerance: Real) -> Self {
        self.edge_parameter_tolerance = tolerance;
        self
    }

    /// Sets the degeneracy threshold.
    #[must_use]
    pub fn with_degeneracy_epsilon(mut self, epsilon: Real) -> Self {
        self.degeneracy_epsilon = epsilon;
        self
    }

    /// Sets the BVH build strategy.
    #[must_use]
    pub fn with_bvh_build_strategy(mut self, strategy: BvhBuildStrategy) -> Self {
        self.bvh_build_strategy = strategy;
        self
    }

    /// The subset of these options read by the narrow-phase tests.
    #[inline]
    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            barycentric_tolerance: self.barycentric_tolerance,
            edge_parameter_tolerance: self.edge_parameter_tolerance,
            degeneracy_epsilon: self.degeneracy_epsilon,
        }
    }
}

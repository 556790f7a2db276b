use crate::ccd::MeshHandle;

/// Errors reported by a [`BroadPhase`](crate::ccd::BroadPhase) implementation.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum BroadPhaseError {
    /// The broad-phase cannot index any more primitives.
    #[error("the broad-phase can index at most {max} primitives but {requested} were requested.")]
    CapacityExceeded {
        /// The total number of primitives that would have been indexed.
        requested: usize,
        /// The maximum number of primitives supported.
        max: usize,
    },
    /// The broad-phase failed to initialize.
    #[error("the broad-phase initialization failed: {0}")]
    Initialization(String),
}

/// Errors reported by the [`MeshCcd`](crate::ccd::MeshCcd) engine.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CcdError {
    /// The given handle does not identify a mesh tracked by the engine.
    #[error("the mesh {0:?} is not tracked by this engine.")]
    MeshNotFound(MeshHandle),
    /// The displacement buffer does not have one element per vertex.
    #[error("the displacement buffer has {found} elements but the mesh has {expected} vertices.")]
    DeltaLengthMismatch {
        /// The number of vertices of the mesh.
        expected: usize,
        /// The length of the displacement buffer.
        found: usize,
    },
    /// The broad-phase reported an error.
    #[error(transparent)]
    BroadPhase(#[from] BroadPhaseError),
}

//! Continuous collision detection between deforming triangle meshes.
//!
//! The [`MeshCcd`] engine tracks a set of meshes, each with an optional per-vertex displacement
//! for the current step. After a call to [`MeshCcd::rebuild`], [`MeshCcd::collide`] reports every
//! triangle-vertex and edge-edge contact happening while the vertices move linearly from their
//! rest positions to their displaced positions.
//!
//! Meshes sharing vertices and edges between adjacent triangles are handled through an ownership
//! scheme (see [`MeshOwnership`]) so that each contact is reported exactly once.

pub use self::broad_phase::{BroadPhase, GeometryHandle, MeshHandle, Primitive};
pub use self::broad_phase_bvh::BvhBroadPhase;
pub use self::error::{BroadPhaseError, CcdError};
pub use self::events::{CcdEventHandler, CcdEvents, EdgeEdgeCollision, TriVertCollision};
pub use self::mesh_ccd::MeshCcd;
pub use self::options::CcdOptions;
pub use self::ownership::{FeatureMask, MeshOwnership};

mod broad_phase;
mod broad_phase_bvh;
mod collide;
mod error;
mod events;
mod mesh_ccd;
mod options;
mod ownership;
mod tracked_mesh;

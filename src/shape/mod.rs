//! Triangle-mesh storage read by the collision-detection engine.

pub use self::ccd_mesh::CcdMesh;
pub use self::trimesh::{TriMesh, TriMeshBuilderError};

mod ccd_mesh;
mod trimesh;

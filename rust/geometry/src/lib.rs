//! mapmesh Geometry Processing
//!
//! Turns an occupancy grid into an extruded box mesh with flat normals,
//! using nalgebra for points and vectors and rayon for the parallel build.

pub mod error;
pub mod extrusion;
pub mod mesh;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use error::{Error, Result};
pub use extrusion::{build_mesh, MeshBuilder, MeshOptions, MeshParams};
pub use mapmesh_core::{CellState, Grid};
pub use mesh::{face_normal, Face, FaceCorner, Mesh, MAX_VERTICES};

//! File format handlers
//!
//! Only the GMD skinned model format lives here for now.

pub mod gmd;

// Re-export main document types
pub use gmd::{AnimatedMesh, Bone, GmdHeader, Mesh, Model, StaticMesh, Vertex, VertexWeight};
pub use gmd::{parse_gmd_bytes, read_model, serialize_gmd, write_model};

//! GMD skinned model format
//!
//! A GMD file is a small header followed by a list of chunks:
//!
//! ```text
//! "GMD\0" | version | name | author | app | numBones | numMeshes | numChunks
//! chunk*  = name | payload size | entry count | payload
//! ```
//!
//! Two chunks are understood, `Bones` and `Meshes`. Any other chunk is skipped
//! using its size field, so files written by newer tools still load.

pub mod batch;
pub mod bone;
pub mod chunk;
pub mod inspect;
pub mod mesh;
pub mod primitives;
pub mod store;
pub mod validate;

mod document;
mod reader;
mod writer;

pub use batch::{BatchValidateResult, FileValidation, ValidateProgress, batch_validate, find_gmd_files};
pub use bone::Bone;
pub use chunk::{ChunkHeader, ChunkWriter, write_chunk};
pub use document::{GmdHeader, Model};
pub use inspect::{ChunkInfo, GmdInfo, ModelInfo, inspect_gmd, inspect_gmd_bytes};
pub use mesh::{AnimatedMesh, Mesh, StaticMesh, Vertex, VertexWeight};
pub use reader::{parse_gmd_bytes, read_model};
pub use store::{LoadOptions, ModelStore};
pub use validate::{ModelValidationResult, ValidationIssue};
pub use writer::{serialize_gmd, write_model};

/// File magic, `"GMD"` plus a terminating NUL.
pub const GMD_MAGIC: [u8; 4] = *b"GMD\0";

/// The only model file version this crate reads and writes.
pub const GMD_VERSION: i32 = 1;

/// Name of the bone table chunk.
pub const BONES_CHUNK: &str = "Bones";

/// Name of the mesh table chunk.
pub const MESHES_CHUNK: &str = "Meshes";

/// Author string written into saved files.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Application string written into saved files.
pub const DEFAULT_APP_NAME: &str = "ogTools";

/// File extension used for model files.
pub const GMD_EXTENSION: &str = "gmd";

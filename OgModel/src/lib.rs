//! # OgModel
//!
//! A pure-Rust library for the GMD chunked binary skinned-model format.
//!
//! ## Supported Features
//!
//! - **Load/Save** - Decode and encode bones and skinned meshes
//! - **Forward compatibility** - Unknown chunks are skipped by size
//! - **Validation** - Optional checks for dangling bone and vertex references
//! - **Inspection** - Header and chunk table dumps without decoding
//! - **Injected I/O** - Any [`stream::FileSystem`], with native and in-memory providers
//!
//! ## Quick Start
//!
//! ```no_run
//! use ogmodel::formats::gmd::ModelStore;
//!
//! let store = ModelStore::native();
//! let model = store.try_load("knight.gmd")?;
//! println!("{} bones, {} meshes", model.num_bones(), model.num_meshes());
//!
//! store.try_save(&model, "knight_copy.gmd")?;
//! # Ok::<(), ogmodel::Error>(())
//! ```
//!
//! ### In-memory models
//!
//! ```
//! use ogmodel::prelude::*;
//! use std::sync::Arc;
//!
//! let fs = MemoryFileSystem::new();
//! let store = ModelStore::new(Arc::new(fs.clone()));
//!
//! let mut model = Model::new();
//! model.add_bone(Bone::root("Root"));
//! assert!(store.save(&model, "root.gmd"));
//!
//! let loaded = store.load("root.gmd").expect("saved above");
//! assert_eq!(loaded.name, "root");
//! assert_eq!(loaded.bones, model.bones);
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `ogmodel` command-line binary

pub mod error;
pub mod formats;
pub mod stream;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::gmd::{
        AnimatedMesh, Bone, GmdHeader, LoadOptions, Mesh, Model, ModelStore, ModelValidationResult,
        StaticMesh, ValidationIssue, Vertex, VertexWeight,
    };
    pub use crate::formats::gmd::{inspect_gmd, parse_gmd_bytes, read_model, serialize_gmd, write_model};
    pub use crate::formats::gmd::{BatchValidateResult, batch_validate, find_gmd_files};
    pub use crate::stream::{FileSystem, MemoryFileSystem, ModelStream, NativeFileSystem};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

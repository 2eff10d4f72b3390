//! Error types for `OgModel`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `OgModel` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from stream operations (short reads, write faults).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream provider could not open the requested file.
    #[error("can't open file '{}': {source}", path.display())]
    StreamOpen {
        /// The path that was requested.
        path: PathBuf,
        /// The underlying error from the provider.
        source: std::io::Error,
    },

    // ==================== GMD Format Errors ====================
    /// The file is not a GMD model (missing `GMD\0` magic).
    #[error("not a model file: expected GMD magic, found {0:?}")]
    InvalidGmdMagic([u8; 4]),

    /// The GMD version is not supported.
    #[error("wrong version ({found}), should be ({expected})")]
    UnsupportedGmdVersion {
        /// The version number found in the file.
        found: i32,
        /// The only version this reader understands.
        expected: i32,
    },

    /// A chunk declared a different entry count than the file header.
    #[error("{field}({expected}) does not match the chunk's numEntries({found})")]
    ChunkEntryMismatch {
        /// Header field the chunk is checked against (`numBones`, `numMeshes`).
        field: &'static str,
        /// Count from the file header.
        expected: u32,
        /// Count declared by the chunk.
        found: u32,
    },

    /// A chunk payload does not fit the 32-bit size field.
    #[error("chunk '{name}' is too large: {size} bytes")]
    ChunkTooLarge {
        /// The chunk name.
        name: String,
        /// The payload size in bytes.
        size: u64,
    },

    /// The stream was moved back before the chunk payload before finishing it.
    #[error("chunk '{name}' ended at offset {position}, before its payload")]
    ChunkRewound {
        /// The chunk name.
        name: String,
        /// Stream position when the chunk was finished.
        position: u64,
    },

    /// A length-prefixed string exceeds the allowed maximum.
    #[error("string length {len} exceeds maximum of {max} bytes")]
    StringTooLong {
        /// The declared or actual length.
        len: usize,
        /// The maximum accepted length.
        max: usize,
    },

    /// A collection has more elements than a 32-bit count can describe.
    #[error("too many {what}: {count}")]
    CountOverflow {
        /// What was being counted.
        what: &'static str,
        /// The element count.
        count: usize,
    },

    // ==================== Model Errors ====================
    /// Mesh texture coordinates and vertices disagree in length.
    #[error("mesh '{mesh}' has {vertices} vertices but {tex_coords} texture coordinates")]
    MeshLayoutMismatch {
        /// The mesh name.
        mesh: String,
        /// Number of vertices.
        vertices: usize,
        /// Number of texture coordinates.
        tex_coords: usize,
    },

    /// The mesh kind cannot be represented in a GMD file.
    #[error("mesh '{mesh}' is a static mesh, which GMD files cannot store")]
    UnsupportedMeshKind {
        /// The mesh name.
        mesh: String,
    },

    /// Strict loading found semantic problems in the model.
    #[error("invalid model: {}", issues.join("; "))]
    InvalidModel {
        /// Description of each problem found.
        issues: Vec<String>,
    },

    // ==================== Parsing Errors ====================
    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Whether this error came from reading past the end of the stream.
    #[must_use]
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

/// A specialized Result type for `OgModel` operations.
pub type Result<T> = std::result::Result<T, Error>;

//! GMD file reading

use std::io::{Cursor, Read, Seek};

use tracing::{debug, warn};

use super::bone::read_bones;
use super::chunk::ChunkHeader;
use super::document::{GmdHeader, Model};
use super::mesh::read_meshes;
use super::primitives::{GmdReadExt, PREALLOC_LIMIT};
use super::{BONES_CHUNK, GMD_MAGIC, GMD_VERSION, MESHES_CHUNK};
use crate::error::{Error, Result};

/// Everything before the first chunk.
#[derive(Debug, Clone)]
pub(crate) struct FileHeader {
    pub version: i32,
    pub meta: GmdHeader,
    pub num_bones: u32,
    pub num_meshes: u32,
    pub num_chunks: u32,
}

impl FileHeader {
    /// Read and check magic and version, then the metadata and counts.
    pub(crate) fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != GMD_MAGIC {
            return Err(Error::InvalidGmdMagic(magic));
        }

        let version = reader.read_gmd_i32()?;
        if version != GMD_VERSION {
            return Err(Error::UnsupportedGmdVersion {
                found: version,
                expected: GMD_VERSION,
            });
        }

        let name = reader.read_gmd_string()?;
        let author = reader.read_gmd_string()?;
        let app_name = reader.read_gmd_string()?;

        Ok(Self {
            version,
            meta: GmdHeader {
                name,
                author,
                app_name,
            },
            num_bones: reader.read_gmd_u32()?,
            num_meshes: reader.read_gmd_u32()?,
            num_chunks: reader.read_gmd_u32()?,
        })
    }
}

fn check_entries(field: &'static str, expected: u32, chunk: &ChunkHeader) -> Result<()> {
    if chunk.entries == expected {
        Ok(())
    } else {
        Err(Error::ChunkEntryMismatch {
            field,
            expected,
            found: chunk.entries,
        })
    }
}

/// Read a model from a seekable stream.
///
/// Unknown chunks are skipped. Nothing is validated beyond the file
/// structure; see [`Model::validate`] for semantic checks.
///
/// # Errors
///
/// Returns [`Error::InvalidGmdMagic`] or [`Error::UnsupportedGmdVersion`] for
/// a foreign file, [`Error::ChunkEntryMismatch`] when a chunk disagrees with
/// the header counts, and [`Error::Io`] for truncated data.
///
/// [`Error::InvalidGmdMagic`]: crate::Error::InvalidGmdMagic
/// [`Error::UnsupportedGmdVersion`]: crate::Error::UnsupportedGmdVersion
/// [`Error::ChunkEntryMismatch`]: crate::Error::ChunkEntryMismatch
/// [`Error::Io`]: crate::Error::Io
pub fn read_model<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Model> {
    let header = FileHeader::read(reader)?;

    let mut model = Model {
        name: header.meta.name,
        author: header.meta.author,
        app_name: header.meta.app_name,
        bones: Vec::with_capacity((header.num_bones as usize).min(PREALLOC_LIMIT)),
        meshes: Vec::with_capacity((header.num_meshes as usize).min(PREALLOC_LIMIT)),
    };

    for _ in 0..header.num_chunks {
        let chunk = ChunkHeader::read(reader)?;
        let payload_start = reader.stream_position()?;

        if chunk.is(BONES_CHUNK) {
            check_entries("numBones", header.num_bones, &chunk)?;
            debug!("Reading {} bones", chunk.entries);
            read_bones(reader, chunk.entries, &mut model.bones)?;
        } else if chunk.is(MESHES_CHUNK) {
            check_entries("numMeshes", header.num_meshes, &chunk)?;
            debug!("Reading {} meshes", chunk.entries);
            read_meshes(reader, chunk.entries, &mut model.meshes)?;
        } else {
            debug!("Skipping unknown chunk '{}' ({} bytes)", chunk.name, chunk.size);
            chunk.skip(reader)?;
            continue;
        }

        let consumed = reader.stream_position()? - payload_start;
        if consumed != u64::from(chunk.size) {
            warn!(
                "Chunk '{}' declares {} bytes but {} were read",
                chunk.name, chunk.size, consumed
            );
        }
    }

    Ok(model)
}

/// Parse a model from an in-memory buffer.
///
/// # Errors
/// See [`read_model`].
pub fn parse_gmd_bytes(data: &[u8]) -> Result<Model> {
    read_model(&mut Cursor::new(data))
}

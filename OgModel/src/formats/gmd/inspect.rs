//! GMD file inspection utilities
//!
//! Reads the header and walks the chunk table without decoding payloads,
//! and summarizes decoded models for display.

use std::io::{Cursor, Read, Seek, SeekFrom};

use serde::Serialize;

use super::chunk::ChunkHeader;
use super::document::Model;
use super::mesh::Mesh;
use super::reader::FileHeader;
use super::{BONES_CHUNK, MESHES_CHUNK};
use crate::error::Result;

/// Information about a GMD file structure.
#[derive(Debug, Clone, Serialize)]
pub struct GmdInfo {
    pub version: i32,
    pub name: String,
    pub author: String,
    pub app_name: String,
    pub num_bones: u32,
    pub num_meshes: u32,
    /// Chunk count declared in the header.
    pub num_chunks: u32,
    pub file_size: u64,
    pub chunks: Vec<ChunkInfo>,
}

/// Information about one chunk.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkInfo {
    pub index: usize,
    pub name: String,
    /// Offset of the payload from the start of the file.
    pub offset: u64,
    pub size: u32,
    pub entries: u32,
    /// Whether this reader decodes the chunk.
    pub known: bool,
    /// The payload runs past the end of the file.
    pub truncated: bool,
}

/// Walk the header and chunk table of a GMD stream.
///
/// A chunk whose payload runs past the end of the file is listed with
/// `truncated` set and ends the walk. A chunk header that is itself cut off
/// is an error, as is an invalid file header.
///
/// # Errors
/// Returns an error if the file header is invalid or a chunk header cannot
/// be read in full.
pub fn inspect_gmd<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<GmdInfo> {
    let file_size = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let header = FileHeader::read(reader)?;
    let mut chunks = Vec::new();

    for index in 0..header.num_chunks as usize {
        let chunk = ChunkHeader::read(reader)?;
        let offset = reader.stream_position()?;
        let truncated = offset + u64::from(chunk.size) > file_size;

        chunks.push(ChunkInfo {
            index,
            known: chunk.is(BONES_CHUNK) || chunk.is(MESHES_CHUNK),
            name: chunk.name.clone(),
            offset,
            size: chunk.size,
            entries: chunk.entries,
            truncated,
        });

        if truncated {
            break;
        }
        chunk.skip(reader)?;
    }

    Ok(GmdInfo {
        version: header.version,
        name: header.meta.name,
        author: header.meta.author,
        app_name: header.meta.app_name,
        num_bones: header.num_bones,
        num_meshes: header.num_meshes,
        num_chunks: header.num_chunks,
        file_size,
        chunks,
    })
}

/// Inspect a GMD file held in memory.
///
/// # Errors
/// See [`inspect_gmd`].
pub fn inspect_gmd_bytes(data: &[u8]) -> Result<GmdInfo> {
    inspect_gmd(&mut Cursor::new(data))
}

/// Bone summary.
#[derive(Debug, Clone, Serialize)]
pub struct BoneInfo {
    pub name: String,
    pub parent_index: i32,
}

/// Mesh summary.
#[derive(Debug, Clone, Serialize)]
pub struct MeshInfo {
    pub name: String,
    pub material: String,
    pub animated: bool,
    pub vertex_count: usize,
    pub index_count: usize,
    /// Largest number of weights on a single vertex.
    pub max_weights: usize,
}

/// Decoded model summary, suitable for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub author: String,
    pub app_name: String,
    pub bones: Vec<BoneInfo>,
    pub meshes: Vec<MeshInfo>,
}

impl ModelInfo {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        let bones = model
            .bones
            .iter()
            .map(|b| BoneInfo {
                name: b.name.clone(),
                parent_index: b.parent_index,
            })
            .collect();

        let meshes = model
            .meshes
            .iter()
            .map(|m| MeshInfo {
                name: m.name().to_string(),
                material: m.material().to_string(),
                animated: m.is_animated(),
                vertex_count: m.num_verts(),
                index_count: m.indices().len(),
                max_weights: match m {
                    Mesh::Animated(a) => a.vertices.iter().map(|v| v.num_weights()).max().unwrap_or(0),
                    Mesh::Static(_) => 0,
                },
            })
            .collect();

        Self {
            name: model.name.clone(),
            author: model.author.clone(),
            app_name: model.app_name.clone(),
            bones,
            meshes,
        }
    }
}

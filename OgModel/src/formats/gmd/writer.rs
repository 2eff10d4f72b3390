//! GMD file writing

use std::io::{Cursor, Seek, Write};

use super::bone::write_bones;
use super::chunk::write_chunk;
use super::document::{GmdHeader, Model};
use super::mesh::write_meshes;
use super::primitives::{GmdWriteExt, wire_count};
use super::{BONES_CHUNK, GMD_MAGIC, GMD_VERSION, MESHES_CHUNK};
use crate::error::Result;

/// Number of chunks this writer produces.
const CHUNK_COUNT: u32 = 2;

/// Write a model to a seekable stream.
///
/// The header strings come from `header`, not from the model.
///
/// # Errors
///
/// Returns [`Error::UnsupportedMeshKind`] for static meshes,
/// [`Error::MeshLayoutMismatch`] when a mesh's texture coordinates and
/// vertices differ in number, and [`Error::Io`] if writing fails.
///
/// [`Error::UnsupportedMeshKind`]: crate::Error::UnsupportedMeshKind
/// [`Error::MeshLayoutMismatch`]: crate::Error::MeshLayoutMismatch
/// [`Error::Io`]: crate::Error::Io
pub fn write_model<W: Write + Seek + ?Sized>(writer: &mut W, model: &Model, header: &GmdHeader) -> Result<()> {
    writer.write_all(&GMD_MAGIC)?;
    writer.write_gmd_i32(GMD_VERSION)?;

    writer.write_gmd_string(&header.name)?;
    writer.write_gmd_string(&header.author)?;
    writer.write_gmd_string(&header.app_name)?;

    let num_bones = wire_count("bones", model.bones.len())?;
    let num_meshes = wire_count("meshes", model.meshes.len())?;
    writer.write_gmd_u32(num_bones)?;
    writer.write_gmd_u32(num_meshes)?;
    writer.write_gmd_u32(CHUNK_COUNT)?;

    write_chunk(writer, BONES_CHUNK, num_bones, |w| write_bones(w, &model.bones))?;
    write_chunk(writer, MESHES_CHUNK, num_meshes, |w| write_meshes(w, &model.meshes))?;

    Ok(())
}

/// Serialize a model to bytes, keeping its own header metadata.
///
/// # Errors
/// See [`write_model`].
pub fn serialize_gmd(model: &Model) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::<u8>::new());
    write_model(&mut cursor, model, &model.header())?;
    Ok(cursor.into_inner())
}

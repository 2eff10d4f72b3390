//! Bone table
//!
//! Bones are stored flat; a bone's index is its position in the table and
//! parents are referenced by index.

use std::io::{Read, Write};

use glam::{Quat, Vec3};

use super::primitives::{GmdReadExt, GmdWriteExt};
use crate::error::Result;

/// A node in the skeleton, in rest pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone; negative for root bones.
    pub parent_index: i32,
    pub origin: Vec3,
    pub orientation: Quat,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent_index: i32, origin: Vec3, orientation: Quat) -> Self {
        Self {
            name: name.into(),
            parent_index,
            origin,
            orientation,
        }
    }

    /// A root bone at the origin with identity orientation.
    pub fn root(name: impl Into<String>) -> Self {
        Self::new(name, -1, Vec3::ZERO, Quat::IDENTITY)
    }

    /// Parent index, or `None` for a root bone.
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        usize::try_from(self.parent_index).ok()
    }

    fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let name = reader.read_gmd_string()?;
        let parent_index = reader.read_gmd_i32()?;
        let origin = reader.read_gmd_vec3()?;
        let orientation = reader.read_gmd_quat()?;
        Ok(Self {
            name,
            parent_index,
            origin,
            orientation,
        })
    }

    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_gmd_string(&self.name)?;
        writer.write_gmd_i32(self.parent_index)?;
        writer.write_gmd_vec3(self.origin)?;
        writer.write_gmd_quat(self.orientation)
    }
}

/// Decode `entries` bones from a `Bones` chunk payload.
pub fn read_bones<R: Read + ?Sized>(reader: &mut R, entries: u32, bones: &mut Vec<Bone>) -> Result<()> {
    for _ in 0..entries {
        bones.push(Bone::read(reader)?);
    }
    Ok(())
}

/// Encode every bone in table order.
pub fn write_bones<W: Write + ?Sized>(writer: &mut W, bones: &[Bone]) -> Result<()> {
    for bone in bones {
        bone.write(writer)?;
    }
    Ok(())
}

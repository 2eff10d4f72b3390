//! Fixed-width values, float arrays and length-prefixed strings
//!
//! Everything is little-endian. Strings are a `u32` byte length followed by
//! UTF-8 bytes with no terminator.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::{Quat, Vec2, Vec3};

use crate::error::{Error, Result};

/// Longest string accepted from a stream, in bytes.
pub const MAX_STRING_LEN: usize = 64 * 1024;

/// Largest element count pre-allocated from an untrusted length field.
pub(crate) const PREALLOC_LIMIT: usize = 4096;

/// Convert a collection length to the `u32` used on the wire.
pub(crate) fn wire_count(what: &'static str, count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| Error::CountOverflow { what, count })
}

/// Reading GMD primitives from any byte source.
pub trait GmdReadExt: Read {
    fn read_gmd_i32(&mut self) -> Result<i32> {
        Ok(self.read_i32::<LittleEndian>()?)
    }

    fn read_gmd_u32(&mut self) -> Result<u32> {
        Ok(self.read_u32::<LittleEndian>()?)
    }

    fn read_gmd_f32(&mut self) -> Result<f32> {
        Ok(self.read_f32::<LittleEndian>()?)
    }

    /// Read a fixed-size float array.
    fn read_gmd_floats<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut values = [0.0f32; N];
        self.read_f32_into::<LittleEndian>(&mut values)?;
        Ok(values)
    }

    fn read_gmd_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::from_array(self.read_gmd_floats()?))
    }

    fn read_gmd_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::from_array(self.read_gmd_floats()?))
    }

    /// Read a quaternion stored as x, y, z, w. Not normalised.
    fn read_gmd_quat(&mut self) -> Result<Quat> {
        Ok(Quat::from_array(self.read_gmd_floats()?))
    }

    /// Read `count` signed integers.
    fn read_gmd_i32_vec(&mut self, count: usize) -> Result<Vec<i32>> {
        let mut values = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        for _ in 0..count {
            values.push(self.read_i32::<LittleEndian>()?);
        }
        Ok(values)
    }

    /// Read a length-prefixed UTF-8 string.
    fn read_gmd_string(&mut self) -> Result<String> {
        let len = self.read_gmd_u32()? as usize;
        if len > MAX_STRING_LEN {
            return Err(Error::StringTooLong {
                len,
                max: MAX_STRING_LEN,
            });
        }

        let mut bytes = vec![0u8; len];
        self.read_exact(&mut bytes)?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl<R: Read + ?Sized> GmdReadExt for R {}

/// Writing GMD primitives to any byte sink.
pub trait GmdWriteExt: Write {
    fn write_gmd_i32(&mut self, value: i32) -> Result<()> {
        Ok(self.write_i32::<LittleEndian>(value)?)
    }

    fn write_gmd_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.write_u32::<LittleEndian>(value)?)
    }

    fn write_gmd_f32(&mut self, value: f32) -> Result<()> {
        Ok(self.write_f32::<LittleEndian>(value)?)
    }

    fn write_gmd_floats(&mut self, values: &[f32]) -> Result<()> {
        for &v in values {
            self.write_f32::<LittleEndian>(v)?;
        }
        Ok(())
    }

    fn write_gmd_vec2(&mut self, v: Vec2) -> Result<()> {
        self.write_gmd_floats(&v.to_array())
    }

    fn write_gmd_vec3(&mut self, v: Vec3) -> Result<()> {
        self.write_gmd_floats(&v.to_array())
    }

    fn write_gmd_quat(&mut self, q: Quat) -> Result<()> {
        self.write_gmd_floats(&q.to_array())
    }

    fn write_gmd_i32_slice(&mut self, values: &[i32]) -> Result<()> {
        for &v in values {
            self.write_i32::<LittleEndian>(v)?;
        }
        Ok(())
    }

    /// Write a length-prefixed UTF-8 string.
    fn write_gmd_string(&mut self, value: &str) -> Result<()> {
        if value.len() > MAX_STRING_LEN {
            return Err(Error::StringTooLong {
                len: value.len(),
                max: MAX_STRING_LEN,
            });
        }
        self.write_gmd_u32(value.len() as u32)?;
        self.write_all(value.as_bytes())?;
        Ok(())
    }
}

impl<W: Write + ?Sized> GmdWriteExt for W {}

//! Chunk framing
//!
//! A chunk is a name, a `u32` payload size and a `u32` entry count, followed
//! by the payload. The size counts only the bytes after the entry count, so a
//! reader that does not understand a chunk can skip it with one relative seek.

use std::io::{Read, Seek, SeekFrom, Write};

use super::primitives::{GmdReadExt, GmdWriteExt};
use crate::error::{Error, Result};

/// Bytes between the size placeholder and the payload (size + entry count).
const SIZE_AND_ENTRIES_LEN: u64 = 8;

/// A chunk header as read from a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
    pub name: String,
    /// Payload length in bytes.
    pub size: u32,
    pub entries: u32,
}

impl ChunkHeader {
    /// Read a chunk header, leaving the stream at the start of the payload.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let name = reader.read_gmd_string()?;
        let size = reader.read_gmd_u32()?;
        let entries = reader.read_gmd_u32()?;
        Ok(Self {
            name,
            size,
            entries,
        })
    }

    /// Whether this chunk has the given name (ASCII case-insensitive).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Skip over the payload.
    pub fn skip<R: Seek + ?Sized>(&self, reader: &mut R) -> Result<()> {
        reader.seek(SeekFrom::Current(i64::from(self.size)))?;
        Ok(())
    }
}

/// An open chunk whose size field still needs patching.
///
/// Created by [`ChunkWriter::start`]; [`ChunkWriter::finish`] patches the
/// size once the payload has been written.
#[must_use = "the chunk size is only written by ChunkWriter::finish"]
pub struct ChunkWriter<'a, W: Write + Seek + ?Sized> {
    writer: &'a mut W,
    name: String,
    size_pos: u64,
}

impl<'a, W: Write + Seek + ?Sized> ChunkWriter<'a, W> {
    /// Write the chunk name, a size placeholder and the entry count.
    pub fn start(writer: &'a mut W, name: &str, entries: u32) -> Result<Self> {
        writer.write_gmd_string(name)?;
        let size_pos = writer.stream_position()?;
        writer.write_gmd_u32(0)?;
        writer.write_gmd_u32(entries)?;
        Ok(Self {
            writer,
            name: name.to_string(),
            size_pos,
        })
    }

    /// The stream the payload is written to.
    pub fn writer(&mut self) -> &mut W {
        &mut *self.writer
    }

    /// Patch the size field and return the payload length.
    ///
    /// The stream is left positioned after the payload.
    pub fn finish(self) -> Result<u32> {
        let end = self.writer.stream_position()?;
        let payload = end
            .checked_sub(self.size_pos + SIZE_AND_ENTRIES_LEN)
            .ok_or_else(|| Error::ChunkRewound {
                name: self.name.clone(),
                position: end,
            })?;
        let size = u32::try_from(payload).map_err(|_| Error::ChunkTooLarge {
            name: self.name.clone(),
            size: payload,
        })?;

        self.writer.seek(SeekFrom::Start(self.size_pos))?;
        self.writer.write_gmd_u32(size)?;
        self.writer.seek(SeekFrom::Start(end))?;
        Ok(size)
    }
}

/// Write a complete chunk whose payload is produced by `body`.
///
/// Returns the payload length written into the size field.
pub fn write_chunk<W, F>(writer: &mut W, name: &str, entries: u32, body: F) -> Result<u32>
where
    W: Write + Seek + ?Sized,
    F: FnOnce(&mut W) -> Result<()>,
{
    let mut chunk = ChunkWriter::start(writer, name, entries)?;
    body(chunk.writer())?;
    chunk.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_size_is_back_patched() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let size = write_chunk(&mut cursor, "Test", 3, |w| {
            w.write_gmd_u32(1)?;
            w.write_gmd_u32(2)?;
            w.write_gmd_u32(3)
        })
        .unwrap();
        assert_eq!(size, 12);

        // Stream is left at the end of the payload
        assert_eq!(cursor.position(), 4 + 4 + 4 + 4 + 12);

        cursor.set_position(0);
        let header = ChunkHeader::read(&mut cursor).unwrap();
        assert_eq!(
            header,
            ChunkHeader {
                name: "Test".to_string(),
                size: 12,
                entries: 3
            }
        );
    }

    #[test]
    fn test_empty_payload() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let chunk = ChunkWriter::start(&mut cursor, "Empty", 0).unwrap();
        assert_eq!(chunk.finish().unwrap(), 0);
    }

    #[test]
    fn test_rewound_writer_is_an_error() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let mut chunk = ChunkWriter::start(&mut cursor, "Test", 1).unwrap();
        chunk.writer().seek(SeekFrom::Start(0)).unwrap();

        let err = chunk.finish().unwrap_err();
        assert!(matches!(err, Error::ChunkRewound { ref name, position: 0 } if name == "Test"));
    }

    #[test]
    fn test_skip_lands_on_next_chunk() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        write_chunk(&mut cursor, "Unknown", 2, |w| w.write_gmd_string("payload data"))
            .unwrap();
        write_chunk(&mut cursor, "Next", 7, |_| Ok(())).unwrap();

        cursor.set_position(0);
        let first = ChunkHeader::read(&mut cursor).unwrap();
        first.skip(&mut cursor).unwrap();
        let second = ChunkHeader::read(&mut cursor).unwrap();
        assert_eq!(second.name, "Next");
        assert_eq!(second.entries, 7);
    }

    #[test]
    fn test_name_match_ignores_case() {
        let header = ChunkHeader {
            name: "BONES".to_string(),
            size: 0,
            entries: 0,
        };
        assert!(header.is("Bones"));
        assert!(!header.is("Meshes"));
    }
}

//! In-memory stream provider

use std::collections::HashMap;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{FileSystem, ModelStream, read_only_error};

type FileMap = HashMap<PathBuf, Vec<u8>>;

/// Stream provider backed by a shared map of byte buffers.
///
/// Written files become visible when their stream is closed. Clones share
/// the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<Mutex<FileMap>>,
}

impl MemoryFileSystem {
    /// Create an empty file system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FileMap> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a file, replacing any previous contents.
    pub fn insert(&self, path: impl Into<PathBuf>, data: Vec<u8>) {
        self.lock().insert(path.into(), data);
    }

    /// Get a copy of a file's contents.
    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().get(path.as_ref()).cloned()
    }

    /// Remove a file, returning its contents.
    pub fn remove(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().remove(path.as_ref())
    }

    /// Number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no files are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl FileSystem for MemoryFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn ModelStream>> {
        let data = self.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })?;
        Ok(Box::new(MemoryStream {
            cursor: Cursor::new(data),
            target: None,
        }))
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn ModelStream>> {
        Ok(Box::new(MemoryStream {
            cursor: Cursor::new(Vec::new()),
            target: Some((self.clone(), path.to_path_buf())),
        }))
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }
}

struct MemoryStream {
    cursor: Cursor<Vec<u8>>,
    /// Where to publish the buffer on close; `None` for read streams.
    target: Option<(MemoryFileSystem, PathBuf)>,
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.target.is_none() {
            return Err(read_only_error());
        }
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl ModelStream for MemoryStream {
    fn close(&mut self) -> io::Result<()> {
        if let Some((fs, path)) = self.target.take() {
            let data = std::mem::take(self.cursor.get_mut());
            fs.insert(path, data);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_after_close() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("model.gmd");

        let mut stream = fs.open_write(path).unwrap();
        stream.write_all(&[1, 2, 3]).unwrap();
        assert!(!fs.exists(path));

        stream.close().unwrap();
        assert_eq!(fs.get(path), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_read_stream_is_read_only() {
        let fs = MemoryFileSystem::new();
        fs.insert("a.bin", vec![9, 8, 7]);

        let mut stream = fs.open_read(Path::new("a.bin")).unwrap();
        let mut buf = [0u8; 3];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7]);
        assert_eq!(
            stream.write(&[0]).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_missing_file() {
        let fs = MemoryFileSystem::new();
        let err = fs.open_read(Path::new("nope.gmd")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

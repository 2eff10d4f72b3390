//! `std::fs` backed stream provider

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{FileSystem, ModelStream, read_only_error};

/// Stream provider for the local file system.
///
/// Relative paths are resolved against an optional root directory.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem {
    root: Option<PathBuf>,
}

impl NativeFileSystem {
    /// Provider that uses paths as given.
    #[must_use]
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Provider that resolves relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl FileSystem for NativeFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn ModelStream>> {
        let file = File::open(self.resolve(path))?;
        Ok(Box::new(NativeStream::Reader(BufReader::new(file))))
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn ModelStream>> {
        let path = self.resolve(path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Box::new(NativeStream::Writer(BufWriter::new(file))))
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }
}

/// Buffered handle on a local file.
enum NativeStream {
    Reader(BufReader<File>),
    Writer(BufWriter<File>),
}

impl Read for NativeStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            NativeStream::Reader(r) => r.read(buf),
            NativeStream::Writer(_) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream was opened for writing",
            )),
        }
    }
}

impl Write for NativeStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            NativeStream::Reader(_) => Err(read_only_error()),
            NativeStream::Writer(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            NativeStream::Reader(_) => Ok(()),
            NativeStream::Writer(w) => w.flush(),
        }
    }
}

impl Seek for NativeStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            NativeStream::Reader(r) => r.seek(pos),
            NativeStream::Writer(w) => w.seek(pos),
        }
    }
}

impl ModelStream for NativeStream {
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let fs = NativeFileSystem::with_root(dir.path());

        let mut stream = fs.open_write(Path::new("sub/file.bin")).unwrap();
        stream.write_all(b"abcd").unwrap();
        stream.seek(SeekFrom::Start(1)).unwrap();
        stream.write_all(b"X").unwrap();
        stream.close().unwrap();

        assert!(fs.exists(Path::new("sub/file.bin")));

        let mut stream = fs.open_read(Path::new("sub/file.bin")).unwrap();
        let mut data = Vec::new();
        stream.read_to_end(&mut data).unwrap();
        assert_eq!(data, b"aXcd");
        assert!(stream.write_all(b"nope").is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let fs = NativeFileSystem::with_root(dir.path());
        assert!(!fs.exists(Path::new("missing.gmd")));
        assert!(fs.open_read(Path::new("missing.gmd")).is_err());
    }
}

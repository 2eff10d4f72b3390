//! Stream providers for model I/O
//!
//! The codec never touches `std::fs` directly. A [`FileSystem`] hands out
//! [`ModelStream`] handles for reading or writing, and the codec drives them
//! through the standard `Read`/`Write`/`Seek` traits (`stream_position` is the
//! "tell" primitive).
//!
//! Implementations must allow independent callers to open and use separate
//! handles from multiple threads at the same time.

mod memory;
mod native;

use std::io::{self, Read, Seek, Write};
use std::path::Path;

pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;

/// A seekable byte stream handed out by a [`FileSystem`].
pub trait ModelStream: Read + Write + Seek + Send {
    /// Flush pending data and release the handle.
    ///
    /// Called exactly once by the model store, on success and on failure.
    ///
    /// # Errors
    /// Returns an error if pending data cannot be flushed.
    fn close(&mut self) -> io::Result<()>;
}

/// File access used by the model store.
pub trait FileSystem: Send + Sync {
    /// Open an existing file for reading.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn ModelStream>>;

    /// Create or truncate a file for writing.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    fn open_write(&self, path: &Path) -> io::Result<Box<dyn ModelStream>>;

    /// Check whether a file exists.
    fn exists(&self, path: &Path) -> bool;
}

pub(crate) fn read_only_error() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "stream was opened for reading")
}

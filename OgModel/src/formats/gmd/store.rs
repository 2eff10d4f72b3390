//! Loading and saving models through a [`FileSystem`]

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::document::{GmdHeader, Model};
use super::inspect::{GmdInfo, inspect_gmd};
use super::reader::read_model;
use super::writer::write_model;
use crate::error::{Error, Result};
use crate::stream::{FileSystem, ModelStream, NativeFileSystem};

/// Options for loading a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Run [`Model::validate`] after decoding and reject models with errors.
    pub strict: bool,
}

impl LoadOptions {
    /// Options that validate the decoded model.
    #[must_use]
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Loads and saves models through an injected stream provider.
///
/// The store holds no mutable state, so one instance can serve many threads.
#[derive(Clone)]
pub struct ModelStore {
    fs: Arc<dyn FileSystem>,
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore").finish_non_exhaustive()
    }
}

impl ModelStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// A store backed by the local filesystem.
    #[must_use]
    pub fn native() -> Self {
        Self::new(Arc::new(NativeFileSystem::new()))
    }

    /// The stream provider this store uses.
    #[must_use]
    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn ModelStream>> {
        self.fs.open_read(path).map_err(|source| Error::StreamOpen {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a model, reporting why it failed.
    ///
    /// # Errors
    /// Returns [`Error::StreamOpen`] if the file cannot be opened, or any
    /// decode error from [`read_model`].
    pub fn try_load(&self, path: impl AsRef<Path>) -> Result<Model> {
        self.try_load_with(path, &LoadOptions::default())
    }

    /// Load a model with explicit options.
    ///
    /// # Errors
    /// As [`ModelStore::try_load`], plus [`Error::InvalidModel`] when
    /// `options.strict` is set and validation finds errors.
    pub fn try_load_with(&self, path: impl AsRef<Path>, options: &LoadOptions) -> Result<Model> {
        let path = path.as_ref();
        let mut stream = self.open_read(path)?;

        let decoded = read_model(stream.as_mut());
        let closed = stream.close();
        let model = decoded?;
        closed?;

        if options.strict {
            let result = model.validate();
            if !result.valid {
                return Err(Error::InvalidModel {
                    issues: result.error_messages(),
                });
            }
        }

        Ok(model)
    }

    /// Load a model, logging and discarding any failure.
    ///
    /// A missing file is a warning; anything else is an error naming the file.
    pub fn load(&self, path: impl AsRef<Path>) -> Option<Model> {
        self.load_with(path, &LoadOptions::default())
    }

    /// [`ModelStore::load`] with explicit options.
    pub fn load_with(&self, path: impl AsRef<Path>, options: &LoadOptions) -> Option<Model> {
        let path = path.as_ref();
        match self.try_load_with(path, options) {
            Ok(model) => Some(model),
            Err(Error::StreamOpen { path, source }) => {
                warn!("Can't open file {}: {}", path.display(), source);
                None
            }
            Err(e) => {
                error!("Failed to load model {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Save a model. The header name is the file stem of `path`.
    ///
    /// # Errors
    /// Returns [`Error::StreamOpen`] if the file cannot be created, or any
    /// encode error from [`write_model`].
    pub fn try_save(&self, model: &Model, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut stream = self.fs.open_write(path).map_err(|source| Error::StreamOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let written = write_model(stream.as_mut(), model, &GmdHeader::for_path(path));
        let closed = stream.close();
        written?;
        closed?;

        info!(
            "Saved {} ({} bones, {} meshes)",
            path.display(),
            model.num_bones(),
            model.num_meshes()
        );
        Ok(())
    }

    /// Save a model, logging any failure. Returns whether it succeeded.
    pub fn save(&self, model: &Model, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_save(model, path) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save model {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Read the header and chunk table of a file without decoding it.
    ///
    /// # Errors
    /// Returns [`Error::StreamOpen`] if the file cannot be opened, or any
    /// error from [`inspect_gmd`].
    pub fn inspect(&self, path: impl AsRef<Path>) -> Result<GmdInfo> {
        let mut stream = self.open_read(path.as_ref())?;
        let info = inspect_gmd(stream.as_mut());
        let closed = stream.close();
        let info = info?;
        closed?;
        Ok(info)
    }
}

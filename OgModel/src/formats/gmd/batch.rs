//! Batch model validation
//!
//! Finds model files on disk and checks them in parallel.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::GMD_EXTENSION;
use super::store::ModelStore;

/// Progress update for a batch run
#[derive(Debug, Clone)]
pub struct ValidateProgress {
    pub current: usize,
    pub total: usize,
    pub current_file: Option<String>,
}

impl ValidateProgress {
    /// Completion as a fraction in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Outcome for one file.
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    /// Decoded and free of validation errors
    pub ok: bool,
    /// Load error, or one message per validation error and warning
    pub messages: Vec<String>,
}

/// Result of a batch validation
#[derive(Debug, Clone)]
pub struct BatchValidateResult {
    /// Number of files that passed
    pub success_count: usize,
    /// Number of files that failed
    pub fail_count: usize,
    /// Per-file outcomes, in input order
    pub results: Vec<FileValidation>,
}

/// Find all .gmd files in a directory recursively
///
/// Returns a sorted list of paths.
pub fn find_gmd_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(GMD_EXTENSION))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

fn validate_one(store: &ModelStore, path: &Path) -> FileValidation {
    let model = match store.try_load(path) {
        Ok(model) => model,
        Err(e) => {
            return FileValidation {
                path: path.to_path_buf(),
                ok: false,
                messages: vec![e.to_string()],
            };
        }
    };

    let result = model.validate();
    let messages = result
        .errors
        .iter()
        .map(|i| format!("error: {i}"))
        .chain(result.warnings.iter().map(|i| format!("warning: {i}")))
        .collect();

    FileValidation {
        path: path.to_path_buf(),
        ok: result.valid,
        messages,
    }
}

/// Load and validate many models in parallel
///
/// # Arguments
/// * `store` - Store the files are loaded through
/// * `files` - Files to check
/// * `progress` - Callback for progress updates
pub fn batch_validate<F>(store: &ModelStore, files: &[PathBuf], progress: F) -> BatchValidateResult
where
    F: Fn(&ValidateProgress) + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let results: Vec<FileValidation> = files
        .par_iter()
        .map(|path| {
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&ValidateProgress {
                current,
                total,
                current_file: Some(path.to_string_lossy().to_string()),
            });

            let outcome = validate_one(store, path);
            if outcome.ok {
                success_counter.fetch_add(1, Ordering::SeqCst);
            } else {
                fail_counter.fetch_add(1, Ordering::SeqCst);
            }
            outcome
        })
        .collect();

    BatchValidateResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}

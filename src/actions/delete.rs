//! Best-effort deletion of approved duplicates.
//!
//! # Overview
//!
//! The [`DeletionExecutor`] removes every candidate in an approved batch.
//! A failure on one file (already gone, permission denied) is logged and
//! recorded, and the remaining files are still attempted. Nothing is rolled
//! back. Bytes from successful removals are added to [`RunAccounting`],
//! which only ever grows during a run.
//!
//! # Example
//!
//! ```no_run
//! use chopy::actions::delete::{DeleteMode, DeletionExecutor, RunAccounting};
//! use chopy::duplicates::DuplicateBatch;
//! use std::path::Path;
//!
//! let executor = DeletionExecutor::new(DeleteMode::Permanent);
//! let mut accounting = RunAccounting::default();
//!
//! let batch = DuplicateBatch::new();
//! let result = executor.execute(Path::new("/data"), &batch);
//! accounting.record(&result);
//! println!("{}", result.summary());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::DuplicateBatch;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Removing the file failed.
    #[error("failed to remove {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error while inspecting the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::RemoveFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// How a confirmed duplicate is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Unlink the file.
    #[default]
    Permanent,
    /// Move the file to the system trash.
    Trash,
}

impl std::fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permanent => write!(f, "permanent"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

/// A successfully removed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size credited for the deletion, in bytes.
    pub size: u64,
}

/// Outcome of deleting one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions with their errors.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes freed by this batch.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {}",
                self.success_count(),
                ByteSize::b(self.bytes_freed)
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.success_count(),
                self.failure_count(),
                ByteSize::b(self.bytes_freed)
            )
        }
    }
}

/// Running totals of what confirmed deletions freed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunAccounting {
    bytes_freed: u64,
    files_deleted: usize,
    failures: usize,
}

impl RunAccounting {
    /// Fold a batch result into the totals.
    pub fn record(&mut self, result: &BatchDeleteResult) {
        self.bytes_freed = self.bytes_freed.saturating_add(result.bytes_freed);
        self.files_deleted += result.success_count();
        self.failures += result.failure_count();
    }

    /// Bytes freed so far.
    #[must_use]
    pub fn bytes_freed(&self) -> u64 {
        self.bytes_freed
    }

    /// Files removed so far.
    #[must_use]
    pub fn files_deleted(&self) -> usize {
        self.files_deleted
    }

    /// Removals that failed so far.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failures
    }
}

/// Removes the files of approved batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeletionExecutor {
    mode: DeleteMode,
}

impl DeletionExecutor {
    /// Create an executor using `mode`.
    #[must_use]
    pub fn new(mode: DeleteMode) -> Self {
        Self { mode }
    }

    /// Deletion mode in use.
    #[must_use]
    pub fn mode(&self) -> DeleteMode {
        self.mode
    }

    /// Delete every candidate of `batch`, resolving paths against `root`.
    ///
    /// Each removed file is credited with the candidate's size as recorded
    /// during the walk. A removed symbolic link is credited with nothing.
    pub fn execute(&self, root: &Path, batch: &DuplicateBatch) -> BatchDeleteResult {
        let mut result = BatchDeleteResult::default();

        for candidate in batch {
            let path = candidate.resolve(root);
            match remove_file(&path, self.mode) {
                Ok(removed) => {
                    log::info!(
                        "File deleted: {} at {}",
                        candidate.name,
                        candidate.relative_path.display()
                    );
                    let size = match removed {
                        Removed::File => candidate.size,
                        Removed::Link => 0,
                    };
                    result.bytes_freed += size;
                    result.successes.push(DeleteResult { path, size });
                }
                Err(e) => {
                    log::warn!("Failed to remove file {}: {}", path.display(), e);
                    result.failures.push((path, e.to_string()));
                }
            }
        }

        log::info!("{}", result.summary());
        result
    }
}

/// What [`remove_file`] actually removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    /// A regular file; its data is released.
    File,
    /// A symbolic link; the target is untouched.
    Link,
}

/// Remove a single file using `mode`.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `RemoveFailed` / `TrashFailed` if the removal itself fails
pub fn remove_file(path: &Path, mode: DeleteMode) -> Result<Removed, DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
        _ => DeleteError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let removed = if metadata.file_type().is_symlink() {
        Removed::Link
    } else {
        Removed::File
    };

    let outcome = match mode {
        DeleteMode::Permanent => fs::remove_file(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
            _ => DeleteError::RemoveFailed {
                path: path.to_path_buf(),
                source: e,
            },
        }),
        DeleteMode::Trash => trash::delete(path).map_err(|e| DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    };

    outcome.map(|()| removed)
}

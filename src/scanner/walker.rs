//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which traverses a directory
//! tree one entry at a time and yields a [`FileRecord`] for every directory
//! and regular file below the root.
//!
//! Traversal is single-threaded and depth-first. Entries inside each
//! directory are visited in file-name order, so for a given tree the order
//! (and therefore which same-named file is seen first) is repeatable.
//!
//! # Features
//!
//! - Optional symlink following (loops are reported as errors)
//! - Each physical file is yielded once, under the first path it is reached by
//! - Hidden entry filtering
//! - Minimum size filtering
//!
//! # Example
//!
//! ```no_run
//! use chopy::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! walker.check_root().expect("root must be a readable directory");
//! let files: Vec<_> = walker
//!     .walk()
//!     .filter_map(Result::ok)
//!     .filter(|r| !r.is_dir)
//!     .collect();
//! println!("Found {} files", files.len());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::identity::SeenFiles;
use super::{FileRecord, ScanError, WalkerConfig};

/// Sequential directory walker.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Verify that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PermissionDenied`, `NotADirectory` or `Io`.
    pub fn check_root(&self) -> Result<(), ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| io_to_scan_error(&self.root, e))?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(ScanError::NotADirectory(self.root.clone()))
        }
    }

    /// Check if a file passes the size filter.
    fn passes_size_filter(&self, size: u64) -> bool {
        self.config.min_size.map_or(true, |min| size >= min)
    }

    /// Walk the directory tree, yielding records in visit order.
    ///
    /// The root itself is not yielded. Errors are yielded as [`ScanError`]
    /// values; callers decide whether to stop.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;
        let mut seen = SeenFiles::new();

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .min_depth(1)
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && is_hidden(entry)))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(entry, &mut seen),
                Err(e) => Some(Err(self.handle_walkdir_error(e))),
            })
    }

    /// Turn a walkdir entry into a record, or `None` if it is filtered out.
    fn process_entry(
        &self,
        entry: DirEntry,
        seen: &mut SeenFiles,
    ) -> Option<Result<FileRecord, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return Some(Ok(FileRecord::directory(entry.into_path())));
        }

        // With follow_links enabled walkdir reports the target's type, so a
        // symlink type here means the link is not being followed.
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walkdir_error(e))),
        };

        let size = metadata.len();
        if !self.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                entry.path().display()
            );
            return None;
        }

        // A hardlink, or the same file reached again through a followed link
        if !seen.first_visit(&metadata) {
            log::debug!(
                "Skipping second path to an already visited file: {}",
                entry.path().display()
            );
            return None;
        }

        Some(Ok(FileRecord::file(entry.into_path(), size)))
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walkdir_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            let ancestor = ancestor.to_path_buf();
            log::warn!(
                "Symlink loop: {} points back to {}",
                path.display(),
                ancestor.display()
            );
            return ScanError::SymlinkLoop { path, ancestor };
        }

        let message = error.to_string();
        match error.into_io_error() {
            Some(io_error) => io_to_scan_error(&path, io_error),
            None => ScanError::Io {
                path,
                source: io::Error::other(message),
            },
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn io_to_scan_error(path: &Path, error: io::Error) -> ScanError {
    match error.kind() {
        io::ErrorKind::PermissionDenied => {
            log::warn!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path.to_path_buf())
        }
        io::ErrorKind::NotFound => {
            log::debug!("Path not found: {}", path.display());
            ScanError::NotFound(path.to_path_buf())
        }
        _ => {
            log::warn!("I/O error for {}: {}", path.display(), error);
            ScanError::Io {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

//! Scanner module for directory traversal and file fingerprinting.
//!
//! This module provides functionality for:
//! - Sequential, name-ordered directory walking using walkdir
//! - Content fingerprinting with SHA-256
//! - Mapping file extensions to human-readable kinds
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and entry discovery
//! - [`hasher`]: Full-content fingerprinting (streaming)
//! - [`kind`]: Extension to kind description lookup
//! - [`identity`]: One visit per physical file (hardlinks, followed links)
//!
//! # Example
//!
//! ```no_run
//! use chopy::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(record) if !record.is_dir => println!("{}: {} bytes", record.path.display(), record.size),
//!         Ok(_) => {}
//!         Err(e) => eprintln!("Walk stopped: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod identity;
pub mod kind;
pub mod walker;

use std::ffi::OsString;
use std::path::PathBuf;

pub use hasher::{fingerprint_to_hex, Fingerprint, Fingerprinter};
pub use identity::SeenFiles;
pub use kind::{describe_kind, extension_of};
pub use walker::Walker;

/// A filesystem entry visited during the walk.
///
/// Records are transient: the finder inspects one, decides what to do with
/// it, and drops it before the next entry is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Final path component, as stored on disk. Not unique across the tree.
    pub name: OsString,
    /// Full path to the entry
    pub path: PathBuf,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl FileRecord {
    /// Create a record for a regular file.
    #[must_use]
    pub fn file(path: PathBuf, size: u64) -> Self {
        Self {
            name: name_of(&path),
            path,
            size,
            is_dir: false,
        }
    }

    /// Create a record for a directory.
    #[must_use]
    pub fn directory(path: PathBuf) -> Self {
        Self {
            name: name_of(&path),
            path,
            size: 0,
            is_dir: true,
        }
    }
}

fn name_of(path: &std::path::Path) -> OsString {
    path.file_name().map(ToOwned::to_owned).unwrap_or_default()
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Symlink cycles are reported as errors by the walker.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `follow_symlinks` - Whether to follow symbolic links
    /// * `skip_hidden` - Whether to skip hidden entries
    /// * `min_size` - Minimum file size filter
    #[must_use]
    pub fn new(follow_symlinks: bool, skip_hidden: bool, min_size: Option<u64>) -> Self {
        Self {
            follow_symlinks,
            skip_hidden,
            min_size,
        }
    }
}

/// Errors that stop a directory walk.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Following symlinks led back to an ancestor directory.
    #[error("Symlink loop at {path} (points back to {ancestor})")]
    SymlinkLoop {
        /// Path of the looping link
        path: PathBuf,
        /// Ancestor the link resolves to
        ancestor: PathBuf,
    },

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::NotADirectory(p) => p,
            Self::SymlinkLoop { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur while fingerprinting a single file.
///
/// These never stop the walk; the file is skipped.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file vanished between listing and opening.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

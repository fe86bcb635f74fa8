//! Physical file identity tracking.
//!
//! One file on disk can be reached through several paths: hardlinks, or a
//! followed symlink to a directory or file. Those paths share content but are
//! the same file, so only the first path is ever offered for comparison.
//! Removing a later path would either free nothing or remove the only copy.
//!
//! On Unix identity is the `(device, inode)` pair. Other platforms do not
//! expose it through [`Metadata`], so tracking is disabled there.

use std::collections::HashSet;
use std::fs::Metadata;

/// Remembers which physical files the walk has already produced.
#[derive(Debug, Default)]
pub struct SeenFiles {
    seen: HashSet<FileId>,
}

impl SeenFiles {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the file behind `metadata`.
    ///
    /// Returns `false` if the same file was already recorded under another
    /// path. Always `true` where identity is unavailable.
    pub fn first_visit(&mut self, metadata: &Metadata) -> bool {
        match FileId::from_metadata(metadata) {
            Some(id) => self.seen.insert(id),
            None => true,
        }
    }

    /// Number of distinct files recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Whether identity tracking works on this platform.
    #[must_use]
    pub const fn is_supported() -> bool {
        cfg!(unix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FileId {
    dev: u64,
    ino: u64,
}

impl FileId {
    #[cfg(unix)]
    fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

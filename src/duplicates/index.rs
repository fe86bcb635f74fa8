//! Name-keyed identity index.
//!
//! The index maps a file name to the fingerprint of the first file with
//! that name seen during the run. It is first-seen-wins: an entry is never
//! updated or removed, so every later file with the same name is compared
//! against that first baseline, even when the files live in unrelated
//! directories.
//!
//! Names are compared exactly as the filesystem stores them, so two names
//! that only look alike once decoded as UTF-8 stay distinct.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};

use crate::scanner::Fingerprint;

/// Mapping from file name to its baseline fingerprint.
#[derive(Debug, Default, Clone)]
pub struct IdentityIndex {
    entries: HashMap<OsString, Fingerprint>,
}

impl IdentityIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline fingerprint for `name`, if one has been recorded.
    #[must_use]
    pub fn lookup(&self, name: impl AsRef<OsStr>) -> Option<&Fingerprint> {
        self.entries.get(name.as_ref())
    }

    /// Record `fingerprint` as the baseline for `name` unless one exists.
    ///
    /// Returns `true` if the entry was inserted, `false` if `name` was
    /// already indexed (the existing baseline is left untouched).
    pub fn insert(&mut self, name: impl Into<OsString>, fingerprint: Fingerprint) -> bool {
        match self.entries.entry(name.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(fingerprint);
                true
            }
        }
    }

    /// Whether `name` has a baseline.
    #[must_use]
    pub fn contains(&self, name: impl AsRef<OsStr>) -> bool {
        self.entries.contains_key(name.as_ref())
    }

    /// Number of distinct names indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Duplicate candidates, the working batch, and the collector that flushes it.
//!
//! # Thresholds
//!
//! The [`DuplicateCollector`] applies two independent limits after every
//! accepted candidate, in this order:
//!
//! 1. **Batch trigger**: when the working batch reaches `batch_size`
//!    (default 10) it is handed to the flush callback and then cleared,
//!    whatever the callback decided. Declined candidates are not offered
//!    again.
//! 2. **Run ceiling**: when the number of duplicates collected during the
//!    run reaches `max_duplicates` (default 100) the collector returns
//!    [`Step::StopAtCeiling`] and the walk must end.
//!
//! A batch smaller than `batch_size` is never flushed, including at the
//! end of the walk.

use std::path::{Path, PathBuf};

use bytesize::ByteSize;

use crate::scanner::{describe_kind, extension_of, FileRecord};

/// Number of candidates that triggers a confirmation prompt.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Number of duplicates after which the run stops.
pub const DEFAULT_MAX_DUPLICATES: usize = 100;

/// A file whose name and content match an earlier file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCandidate {
    /// File name for display (undecodable bytes replaced)
    pub name: String,
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Size rendered with IEC units
    pub size_display: String,
    /// Extension tag including the dot, or empty
    pub kind: String,
}

impl DuplicateCandidate {
    /// Build a candidate from a visited file under `root`.
    #[must_use]
    pub fn from_record(record: &FileRecord, root: &Path) -> Self {
        let relative_path = record
            .path
            .strip_prefix(root)
            .unwrap_or(&record.path)
            .to_path_buf();

        Self {
            name: record.name.to_string_lossy().into_owned(),
            relative_path,
            size: record.size,
            size_display: ByteSize::b(record.size).to_string(),
            kind: extension_of(&record.path),
        }
    }

    /// Absolute location of the file for a given scan root.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.relative_path)
    }

    /// Human description of the file kind.
    #[must_use]
    pub fn kind_description(&self) -> &'static str {
        describe_kind(&self.kind)
    }
}

/// Ordered set of candidates awaiting a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateBatch {
    candidates: Vec<DuplicateCandidate>,
}

impl DuplicateBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate.
    pub fn push(&mut self, candidate: DuplicateCandidate) {
        self.candidates.push(candidate);
    }

    /// Remove every candidate.
    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    /// Candidates in insertion order.
    #[must_use]
    pub fn candidates(&self) -> &[DuplicateCandidate] {
        &self.candidates
    }

    /// Iterate over candidates.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateCandidate> {
        self.candidates.iter()
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Sum of candidate sizes in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.candidates.iter().map(|c| c.size).sum()
    }
}

impl FromIterator<DuplicateCandidate> for DuplicateBatch {
    fn from_iter<I: IntoIterator<Item = DuplicateCandidate>>(iter: I) -> Self {
        Self {
            candidates: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DuplicateBatch {
    type Item = &'a DuplicateCandidate;
    type IntoIter = std::slice::Iter<'a, DuplicateCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// What the walk should do after a candidate is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Step {
    /// Keep walking.
    Continue,
    /// The run ceiling was reached; stop without error.
    StopAtCeiling,
}

/// Accumulates candidates and enforces the batch trigger and run ceiling.
#[derive(Debug, Clone)]
pub struct DuplicateCollector {
    batch: DuplicateBatch,
    batch_size: usize,
    max_duplicates: usize,
    collected: usize,
    flushes: usize,
}

impl Default for DuplicateCollector {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, DEFAULT_MAX_DUPLICATES)
    }
}

impl DuplicateCollector {
    /// Create a collector. Both limits are clamped to at least 1.
    #[must_use]
    pub fn new(batch_size: usize, max_duplicates: usize) -> Self {
        Self {
            batch: DuplicateBatch::new(),
            batch_size: batch_size.max(1),
            max_duplicates: max_duplicates.max(1),
            collected: 0,
            flushes: 0,
        }
    }

    /// Append a candidate, flushing and checking the ceiling as needed.
    ///
    /// `on_full` runs exactly when the batch reaches the trigger size. The
    /// batch is cleared after it returns.
    pub fn offer<F>(&mut self, candidate: DuplicateCandidate, on_full: F) -> Step
    where
        F: FnOnce(&DuplicateBatch),
    {
        self.batch.push(candidate);
        self.collected += 1;

        if self.batch.len() >= self.batch_size {
            log::debug!("Batch of {} duplicates ready for review", self.batch.len());
            on_full(&self.batch);
            self.batch.clear();
            self.flushes += 1;
        }

        if self.collected >= self.max_duplicates {
            log::debug!(
                "Run ceiling of {} duplicates reached",
                self.max_duplicates
            );
            return Step::StopAtCeiling;
        }

        Step::Continue
    }

    /// Candidates collected since the last flush.
    #[must_use]
    pub fn pending(&self) -> &DuplicateBatch {
        &self.batch
    }

    /// Duplicates collected over the whole run.
    #[must_use]
    pub fn collected(&self) -> usize {
        self.collected
    }

    /// Number of batches handed to `on_full`.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Batch trigger size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Run ceiling.
    #[must_use]
    pub fn max_duplicates(&self) -> usize {
        self.max_duplicates
    }
}

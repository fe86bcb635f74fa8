//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - The name-keyed identity index (first-seen-wins baselines)
//! - Duplicate candidates and the bounded working batch
//! - The finder that drives a run end to end

pub mod batch;
pub mod finder;
pub mod index;

pub use batch::{
    DuplicateBatch, DuplicateCandidate, DuplicateCollector, Step, DEFAULT_BATCH_SIZE,
    DEFAULT_MAX_DUPLICATES,
};
pub use finder::{DuplicateFinder, FinderConfig, RunOutcome, RunSummary};
pub use index::IdentityIndex;

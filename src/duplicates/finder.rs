//! Duplicate finder: drives the walk and owns all per-run state.
//!
//! # Overview
//!
//! For each entry produced by the [`Walker`], in visit order:
//!
//! 1. Directories are counted and skipped.
//! 2. The file is fingerprinted. If that fails the file is logged and
//!    skipped; the walk goes on.
//! 3. The file name is looked up in the [`IdentityIndex`]. An unseen name
//!    becomes the baseline for that name. A seen name whose baseline
//!    fingerprint is equal produces a [`DuplicateCandidate`]; a different
//!    fingerprint produces nothing.
//! 4. Candidates go to the [`DuplicateCollector`]. When a batch fills up the
//!    [`Confirmer`] is asked, approved batches go to the
//!    [`DeletionExecutor`], and the freed bytes are added to the
//!    [`RunAccounting`].
//!
//! The walk ends when the tree is exhausted ([`RunOutcome::Completed`]),
//! when the run ceiling is hit ([`RunOutcome::CeilingReached`]), or on the
//! first traversal error ([`RunOutcome::Failed`]). Nothing more is visited
//! after either stop.
//!
//! # Example
//!
//! ```no_run
//! use chopy::actions::ConsoleConfirmer;
//! use chopy::duplicates::{DuplicateFinder, FinderConfig, RunOutcome};
//! use std::path::Path;
//!
//! let mut finder = DuplicateFinder::new(FinderConfig::default(), ConsoleConfirmer::stdio());
//! let summary = finder.run(Path::new("/home/user/Documents"));
//!
//! if let RunOutcome::CeilingReached { duplicates } = summary.outcome {
//!     println!("Stopped after finding {duplicates} duplicates.");
//! }
//! println!("{} freed!", summary.freed_display());
//! ```

use std::path::Path;
use std::sync::Arc;

use bytesize::ByteSize;

use super::batch::{
    DuplicateCandidate, DuplicateCollector, Step, DEFAULT_BATCH_SIZE, DEFAULT_MAX_DUPLICATES,
};
use super::index::IdentityIndex;
use super::DuplicateBatch;
use crate::actions::{Confirmer, DeleteMode, DeletionExecutor, RunAccounting};
use crate::progress::ProgressCallback;
use crate::scanner::{
    fingerprint_to_hex, FileRecord, Fingerprinter, ScanError, Walker, WalkerConfig,
};

/// Configuration for a duplicate-removal run.
#[derive(Clone)]
pub struct FinderConfig {
    /// Duplicates per confirmation prompt.
    pub batch_size: usize,
    /// Duplicates after which the run stops.
    pub max_duplicates: usize,
    /// How approved duplicates are removed.
    pub delete_mode: DeleteMode,
    /// Traversal options.
    pub walker: WalkerConfig,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("batch_size", &self.batch_size)
            .field("max_duplicates", &self.max_duplicates)
            .field("delete_mode", &self.delete_mode)
            .field("walker", &self.walker)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_duplicates: DEFAULT_MAX_DUPLICATES,
            delete_mode: DeleteMode::default(),
            walker: WalkerConfig::default(),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the batch trigger size (minimum 1).
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the run ceiling (minimum 1).
    #[must_use]
    pub fn with_max_duplicates(mut self, max: usize) -> Self {
        self.max_duplicates = max.max(1);
        self
    }

    /// Set the deletion mode.
    #[must_use]
    pub fn with_delete_mode(mut self, mode: DeleteMode) -> Self {
        self.delete_mode = mode;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every entry under the root was visited.
    Completed,
    /// The run ceiling stopped the walk early. Not an error.
    CeilingReached {
        /// Duplicates collected when the walk stopped
        duplicates: usize,
    },
    /// A traversal error stopped the walk.
    Failed(ScanError),
}

impl RunOutcome {
    /// Whether the walk ended on a traversal error.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Totals for one run.
#[derive(Debug)]
pub struct RunSummary {
    /// How the walk ended
    pub outcome: RunOutcome,
    /// Regular files visited (including ones that failed to hash)
    pub files_scanned: usize,
    /// Directories visited below the root
    pub directories_visited: usize,
    /// Files skipped because they could not be fingerprinted
    pub hash_failures: usize,
    /// Duplicate candidates collected
    pub duplicates_found: usize,
    /// Batches shown to the confirmer
    pub batches_flushed: usize,
    /// Batches the confirmer approved
    pub batches_approved: usize,
    /// Files removed
    pub files_deleted: usize,
    /// Removals that failed
    pub delete_failures: usize,
    /// Bytes freed by removals
    pub bytes_freed: u64,
    /// Candidates left in the unfinished batch (never reviewed)
    pub pending: usize,
}

impl RunSummary {
    /// Freed bytes with IEC units.
    #[must_use]
    pub fn freed_display(&self) -> String {
        ByteSize::b(self.bytes_freed).to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct WalkStats {
    files_scanned: usize,
    directories_visited: usize,
    hash_failures: usize,
    batches_approved: usize,
}

/// Engine for one run over one directory tree.
pub struct DuplicateFinder<C> {
    config: FinderConfig,
    confirmer: C,
    fingerprinter: Fingerprinter,
    index: IdentityIndex,
    collector: DuplicateCollector,
    executor: DeletionExecutor,
    accounting: RunAccounting,
    stats: WalkStats,
}

impl<C: Confirmer> DuplicateFinder<C> {
    /// Create a finder with empty run state.
    #[must_use]
    pub fn new(config: FinderConfig, confirmer: C) -> Self {
        let collector = DuplicateCollector::new(config.batch_size, config.max_duplicates);
        let executor = DeletionExecutor::new(config.delete_mode);
        Self {
            config,
            confirmer,
            fingerprinter: Fingerprinter::new(),
            index: IdentityIndex::new(),
            collector,
            executor,
            accounting: RunAccounting::default(),
            stats: WalkStats::default(),
        }
    }

    /// Identity index built so far.
    #[must_use]
    pub fn index(&self) -> &IdentityIndex {
        &self.index
    }

    /// Candidates waiting for the batch to fill.
    #[must_use]
    pub fn pending(&self) -> &DuplicateBatch {
        self.collector.pending()
    }

    /// Space accounting so far.
    #[must_use]
    pub fn accounting(&self) -> &RunAccounting {
        &self.accounting
    }

    /// Walk `root` and process every entry until the walk ends.
    pub fn run(&mut self, root: &Path) -> RunSummary {
        let walker = Walker::new(root, self.config.walker.clone());
        log::info!(
            "Scanning {} (approved duplicates: {})",
            root.display(),
            self.executor.mode()
        );

        let outcome = self.walk(&walker);

        if let Some(cb) = &self.config.progress_callback {
            cb.on_finish();
        }

        match &outcome {
            RunOutcome::Completed => log::debug!("Walk completed"),
            RunOutcome::CeilingReached { duplicates } => {
                log::info!("Stopped after finding {} duplicates", duplicates);
            }
            RunOutcome::Failed(e) => log::error!("Walk stopped: {}", e),
        }

        self.summarize(outcome)
    }

    fn walk(&mut self, walker: &Walker) -> RunOutcome {
        if let Err(e) = walker.check_root() {
            return RunOutcome::Failed(e);
        }

        for entry in walker.walk() {
            let record = match entry {
                Ok(record) => record,
                Err(e) => {
                    log::error!("Error accessing path {}: {}", e.path().display(), e);
                    return RunOutcome::Failed(e);
                }
            };

            if self.visit(walker.root(), &record) == Step::StopAtCeiling {
                return RunOutcome::CeilingReached {
                    duplicates: self.collector.collected(),
                };
            }
        }

        RunOutcome::Completed
    }

    /// Process one visited entry.
    ///
    /// `root` is the scan root used to derive relative candidate paths and
    /// to resolve them again at deletion time.
    pub fn visit(&mut self, root: &Path, record: &FileRecord) -> Step {
        if record.is_dir {
            self.stats.directories_visited += 1;
            return Step::Continue;
        }

        self.stats.files_scanned += 1;
        if let Some(cb) = &self.config.progress_callback {
            cb.on_file(&record.path);
        }

        let fingerprint = match self.fingerprinter.fingerprint(&record.path) {
            Ok(fp) => fp,
            Err(e) => {
                log::warn!(
                    "Failed to calculate hash for file {}: {}",
                    record.path.display(),
                    e
                );
                self.stats.hash_failures += 1;
                return Step::Continue;
            }
        };

        log::trace!(
            "{} {}",
            fingerprint_to_hex(&fingerprint),
            record.path.display()
        );

        match self.index.lookup(&record.name).map(|baseline| *baseline == fingerprint) {
            None => {
                self.index.insert(record.name.clone(), fingerprint);
                Step::Continue
            }
            Some(true) => {
                let candidate = DuplicateCandidate::from_record(record, root);
                log::debug!("Duplicate: {}", candidate.relative_path.display());
                self.collect(root, candidate)
            }
            Some(false) => {
                log::trace!(
                    "Same name, different content: {}",
                    record.path.display()
                );
                Step::Continue
            }
        }
    }

    fn collect(&mut self, root: &Path, candidate: DuplicateCandidate) -> Step {
        let Self {
            config,
            confirmer,
            collector,
            executor,
            accounting,
            stats,
            ..
        } = self;
        let progress = config.progress_callback.as_deref();

        if let Some(cb) = progress {
            cb.on_duplicate(&candidate);
        }

        collector.offer(candidate, |batch| {
            if let Some(cb) = progress {
                cb.on_prompt(batch.len());
            }

            if confirmer.confirm(batch) {
                stats.batches_approved += 1;
                let result = executor.execute(root, batch);
                accounting.record(&result);
                if let Some(cb) = progress {
                    cb.on_freed(accounting.bytes_freed());
                }
            } else {
                log::info!(
                    "Keeping {} duplicates ({})",
                    batch.len(),
                    ByteSize::b(batch.total_size())
                );
            }
        })
    }

    fn summarize(&self, outcome: RunOutcome) -> RunSummary {
        RunSummary {
            outcome,
            files_scanned: self.stats.files_scanned,
            directories_visited: self.stats.directories_visited,
            hash_failures: self.stats.hash_failures,
            duplicates_found: self.collector.collected(),
            batches_flushed: self.collector.flushes(),
            batches_approved: self.stats.batches_approved,
            files_deleted: self.accounting.files_deleted(),
            delete_failures: self.accounting.failures(),
            bytes_freed: self.accounting.bytes_freed(),
            pending: self.collector.pending().len(),
        }
    }
}

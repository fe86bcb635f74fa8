//! Progress reporting utilities using indicatif.
//!
//! The finder reports what it is doing through [`ProgressCallback`]. The
//! [`Progress`] implementation draws a spinner with running totals and
//! clears it whenever a confirmation prompt is about to be printed, so the
//! listing and the question are never overdrawn.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::duplicates::DuplicateCandidate;

/// Receives progress updates from the duplicate finder.
pub trait ProgressCallback: Send + Sync {
    /// Called before a file is fingerprinted.
    fn on_file(&self, path: &Path);

    /// Called when a duplicate candidate is collected.
    fn on_duplicate(&self, _candidate: &DuplicateCandidate) {}

    /// Called right before the operator is asked about a batch.
    ///
    /// # Arguments
    ///
    /// * `batch_len` - Number of duplicates in the batch
    fn on_prompt(&self, _batch_len: usize) {}

    /// Called after a batch is deleted, with the run total.
    fn on_freed(&self, _total_bytes: u64) {}

    /// Called once when the walk ends.
    fn on_finish(&self);
}

#[derive(Debug, Default)]
struct Counters {
    files: u64,
    duplicates: u64,
    freed: u64,
}

/// Spinner-based progress reporter.
pub struct Progress {
    spinner: Mutex<Option<ProgressBar>>,
    counters: Mutex<Counters>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use chopy::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            counters: Mutex::new(Counters::default()),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn message(counters: &Counters, path: &Path) -> String {
        format!(
            "{} files, {} duplicates, {} freed | {}",
            counters.files,
            counters.duplicates,
            ByteSize::b(counters.freed),
            truncate_path(&path.to_string_lossy(), 40)
        )
    }

    /// Take the spinner off the screen; the next file brings it back.
    fn clear(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_file(&self, path: &Path) {
        if self.quiet {
            return;
        }

        let Ok(mut counters) = self.counters.lock() else {
            return;
        };
        counters.files += 1;

        if let Ok(mut spinner) = self.spinner.lock() {
            let pb = spinner.get_or_insert_with(|| {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            });
            pb.set_message(Self::message(&counters, path));
        }
    }

    fn on_duplicate(&self, _candidate: &DuplicateCandidate) {
        if let Ok(mut counters) = self.counters.lock() {
            counters.duplicates += 1;
        }
    }

    fn on_prompt(&self, _batch_len: usize) {
        self.clear();
    }

    fn on_freed(&self, total_bytes: u64) {
        if let Ok(mut counters) = self.counters.lock() {
            counters.freed = total_bytes;
        }
    }

    fn on_finish(&self) {
        self.clear();
    }
}

/// Truncate a path for display in the spinner.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}

//! Shared fixtures for integration tests.

use chopy::actions::Confirmer;
use chopy::duplicates::{DuplicateBatch, DuplicateFinder, FinderConfig, RunSummary};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Confirmer that replays scripted answers and records what it was shown.
///
/// Once the script runs out every further batch is declined.
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: VecDeque<bool>,
    /// Relative paths of every batch shown, in prompt order.
    pub prompts: Vec<Vec<PathBuf>>,
}

impl ScriptedConfirmer {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }

    pub fn prompt_sizes(&self) -> Vec<usize> {
        self.prompts.iter().map(Vec::len).collect()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&mut self, batch: &DuplicateBatch) -> bool {
        self.prompts
            .push(batch.iter().map(|c| c.relative_path.clone()).collect());
        self.answers.pop_front().unwrap_or(false)
    }
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Create `count` copies of `name` in zero-padded sibling directories
/// (`d000/name`, `d001/name`, ...), so walk order matches index order.
pub fn write_copies(root: &Path, name: &str, content: &[u8], count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| write_file(root, &format!("d{i:03}/{name}"), content))
        .collect()
}

/// Run a finder with default settings and the given confirmer.
pub fn run_default(root: &Path, confirmer: &mut ScriptedConfirmer) -> RunSummary {
    DuplicateFinder::new(FinderConfig::default(), confirmer).run(root)
}

//! Operator confirmation for duplicate batches.
//!
//! A [`Confirmer`] sees each full batch and answers whether it may be
//! deleted. The console implementation prints the batch and blocks on one
//! line of input; only `y`/`Y` approves. Empty input, anything else, and
//! read failures all decline.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::duplicates::DuplicateBatch;

/// Decides whether a batch of duplicates may be deleted.
pub trait Confirmer {
    /// Return `true` to delete every file in `batch`.
    fn confirm(&mut self, batch: &DuplicateBatch) -> bool;
}

impl<C: Confirmer + ?Sized> Confirmer for &mut C {
    fn confirm(&mut self, batch: &DuplicateBatch) -> bool {
        (**self).confirm(batch)
    }
}

impl<C: Confirmer + ?Sized> Confirmer for Box<C> {
    fn confirm(&mut self, batch: &DuplicateBatch) -> bool {
        (**self).confirm(batch)
    }
}

/// Interpret one line of operator input.
#[must_use]
pub fn parse_answer(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}

/// Write the batch listing and the question (without a trailing newline).
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn render_batch<W: Write>(out: &mut W, batch: &DuplicateBatch) -> io::Result<()> {
    for candidate in batch {
        writeln!(out)?;
        writeln!(out, "Name: {}", candidate.name)?;
        writeln!(out, "Path: {}", candidate.relative_path.display())?;
        writeln!(out, "Size: {}", candidate.size_display)?;
        if candidate.kind.is_empty() {
            writeln!(out, "Kind: {}", candidate.kind_description())?;
        } else {
            writeln!(
                out,
                "Kind: {} ({})",
                candidate.kind,
                candidate.kind_description()
            )?;
        }
    }

    write!(
        out,
        "\nDelete these {} files to save {} of space on your computer? [y/N]: ",
        batch.len(),
        ByteSize::b(batch.total_size()).bold()
    )?;
    out.flush()
}

/// Prompts on a writer and reads the answer from a line reader.
#[derive(Debug)]
pub struct ConsoleConfirmer<R, W> {
    input: R,
    output: W,
}

impl ConsoleConfirmer<StdinLock<'static>, Stdout> {
    /// Confirmer bound to the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleConfirmer<R, W> {
    /// Create a confirmer over arbitrary streams.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the confirmer and return its streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Confirmer for ConsoleConfirmer<R, W> {
    fn confirm(&mut self, batch: &DuplicateBatch) -> bool {
        if let Err(e) = render_batch(&mut self.output, batch) {
            log::warn!("Failed to display duplicate batch: {}", e);
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) => {
                log::warn!("No response (end of input); keeping these files");
                false
            }
            Ok(_) => {
                let approved = parse_answer(&answer);
                log::debug!(
                    "Operator answered {:?}: {}",
                    answer.trim(),
                    if approved { "delete" } else { "keep" }
                );
                approved
            }
            Err(e) => {
                log::error!("Error reading your response: {}", e);
                false
            }
        }
    }
}

/// Approves every batch without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&mut self, batch: &DuplicateBatch) -> bool {
        log::info!(
            "Auto-confirming deletion of {} duplicates ({})",
            batch.len(),
            ByteSize::b(batch.total_size())
        );
        true
    }
}

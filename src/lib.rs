//! chopy - interactive remover of same-named duplicate files.
//!
//! chopy walks a directory tree and treats a file as a duplicate when an
//! earlier file with the same name had identical content. Duplicates are
//! gathered ten at a time, listed, and deleted only after the operator
//! answers `y`. The run stops after 100 duplicates.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod scanner;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use yansi::Paint;

use crate::actions::{AssumeYes, Confirmer, ConsoleConfirmer};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, RunOutcome, RunSummary};
use crate::error::ExitCode;
use crate::progress::{Progress, ProgressCallback};

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the summary
/// cannot be written. A failed walk is not an error here; it maps to
/// [`ExitCode::TraversalFailed`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);
    config.validate()?;

    let root = config.resolve_root(&cli.path);
    log::debug!("Resolved scan root: {}", root.display());

    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(cli.quiet));
    let finder_config = config.finder_config().with_progress_callback(progress);

    let summary = if cli.yes {
        run_finder(finder_config, AssumeYes, &root)
    } else {
        run_finder(finder_config, ConsoleConfirmer::stdio(), &root)
    };

    let mut stdout = io::stdout().lock();
    print_summary(&mut stdout, &root, &summary).context("Failed to write summary")?;

    Ok(exit_code_for(&summary))
}

fn run_finder<C: Confirmer>(config: FinderConfig, confirmer: C, root: &Path) -> RunSummary {
    DuplicateFinder::new(config, confirmer).run(root)
}

/// Process exit code for a finished run.
#[must_use]
pub fn exit_code_for(summary: &RunSummary) -> ExitCode {
    match summary.outcome {
        RunOutcome::Failed(_) => ExitCode::TraversalFailed,
        RunOutcome::Completed | RunOutcome::CeilingReached { .. } => ExitCode::Success,
    }
}

/// Write the end-of-run report.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn print_summary<W: Write>(out: &mut W, root: &Path, summary: &RunSummary) -> io::Result<()> {
    match &summary.outcome {
        RunOutcome::Completed => {}
        RunOutcome::CeilingReached { duplicates } => {
            writeln!(out, "Stopped after finding {duplicates} duplicates.")?;
        }
        RunOutcome::Failed(e) => {
            writeln!(
                out,
                "{} {}: {}",
                "error walking the path".red().bold(),
                root.display(),
                e
            )?;
        }
    }

    if summary.pending > 0 {
        writeln!(
            out,
            "{} duplicates were found but not reviewed.",
            summary.pending
        )?;
    }

    if summary.delete_failures > 0 {
        writeln!(
            out,
            "{} files could not be deleted.",
            summary.delete_failures.yellow()
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", format!("{} freed!", summary.freed_display()).green().bold())
}

//! Confirmation, deletion and ceiling behavior.

use super::support::{run_default, write_copies, write_file, ScriptedConfirmer};
use chopy::actions::{AssumeYes, ConsoleConfirmer};
use chopy::duplicates::{DuplicateFinder, FinderConfig, RunOutcome};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

#[test]
fn test_declined_batch_keeps_files() {
    let dir = TempDir::new().unwrap();
    let paths = write_copies(dir.path(), "x.txt", b"keep me", 11);

    let mut confirmer = ScriptedConfirmer::new([false]);
    let summary = run_default(dir.path(), &mut confirmer);

    assert_eq!(confirmer.prompt_sizes(), vec![10]);
    assert_eq!(summary.batches_flushed, 1);
    assert_eq!(summary.batches_approved, 0);
    assert_eq!(summary.files_deleted, 0);
    assert_eq!(summary.bytes_freed, 0);
    assert_eq!(summary.pending, 0);
    assert!(paths.iter().all(|p| p.exists()));
}

#[test]
fn test_approved_batch_deletes_and_credits_sizes() {
    let dir = TempDir::new().unwrap();
    let content = b"0123456789abcdef";
    let paths = write_copies(dir.path(), "x.txt", content, 11);

    let mut confirmer = ScriptedConfirmer::new([true]);
    let summary = run_default(dir.path(), &mut confirmer);

    assert_eq!(summary.files_deleted, 10);
    assert_eq!(summary.bytes_freed, 10 * content.len() as u64);
    assert!(paths[0].exists(), "baseline must survive");
    assert!(paths[1..].iter().all(|p| !p.exists()));
}

#[test]
fn test_prompt_lists_duplicates_in_visit_order() {
    let dir = TempDir::new().unwrap();
    write_copies(dir.path(), "x.txt", b"a", 11);

    let mut confirmer = ScriptedConfirmer::declining();
    run_default(dir.path(), &mut confirmer);

    let shown: Vec<String> = confirmer.prompts[0]
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(shown.first().map(String::as_str), Some("d001/x.txt"));
    assert_eq!(shown.last().map(String::as_str), Some("d010/x.txt"));
}

#[test]
fn test_mixed_answers_across_batches() {
    let dir = TempDir::new().unwrap();
    write_copies(dir.path(), "x.txt", b"xx", 21);

    let mut confirmer = ScriptedConfirmer::new([false, true]);
    let summary = run_default(dir.path(), &mut confirmer);

    assert_eq!(confirmer.prompt_sizes(), vec![10, 10]);
    assert_eq!(summary.batches_approved, 1);
    assert_eq!(summary.files_deleted, 10);
    assert_eq!(summary.bytes_freed, 20);
    assert!(dir.path().join("d010/x.txt").exists());
    assert!(!dir.path().join("d011/x.txt").exists());
}

#[test]
fn test_vanished_file_does_not_abort_batch() {
    let dir = TempDir::new().unwrap();
    let paths = write_copies(dir.path(), "x.txt", b"abc", 11);

    // Remove one duplicate while its batch is pending
    struct RemoveThenApprove(std::path::PathBuf);
    impl chopy::actions::Confirmer for RemoveThenApprove {
        fn confirm(&mut self, _batch: &chopy::duplicates::DuplicateBatch) -> bool {
            fs::remove_file(&self.0).unwrap();
            true
        }
    }

    let confirmer = RemoveThenApprove(paths[5].clone());
    let summary = DuplicateFinder::new(FinderConfig::default(), confirmer).run(dir.path());

    assert_eq!(summary.files_deleted, 9);
    assert_eq!(summary.delete_failures, 1);
    assert_eq!(summary.bytes_freed, 27);
    assert!(paths[1..].iter().all(|p| !p.exists()));
}

#[test]
fn test_ceiling_stops_walk() {
    let dir = TempDir::new().unwrap();
    write_copies(dir.path(), "x.txt", b"dup", 101);
    // Sorts after every dNNN directory, so only reached if the walk continues
    write_file(dir.path(), "zz/other.txt", b"late");

    let mut confirmer = ScriptedConfirmer::declining();
    let summary = run_default(dir.path(), &mut confirmer);

    assert!(matches!(
        summary.outcome,
        RunOutcome::CeilingReached { duplicates: 100 }
    ));
    assert_eq!(confirmer.prompt_sizes(), vec![10; 10]);
    assert_eq!(summary.files_scanned, 101);
    assert_eq!(summary.pending, 0);
}

#[test]
fn test_ceiling_with_smaller_limits() {
    let dir = TempDir::new().unwrap();
    write_copies(dir.path(), "x.txt", b"dup", 10);

    let config = FinderConfig::default()
        .with_batch_size(4)
        .with_max_duplicates(6);
    let mut confirmer = ScriptedConfirmer::declining();
    let summary = DuplicateFinder::new(config, &mut confirmer).run(dir.path());

    assert!(matches!(
        summary.outcome,
        RunOutcome::CeilingReached { duplicates: 6 }
    ));
    assert_eq!(confirmer.prompt_sizes(), vec![4]);
    assert_eq!(summary.pending, 2);
}

#[test]
fn test_assume_yes_deletes_everything_flushed() {
    let dir = TempDir::new().unwrap();
    write_copies(dir.path(), "x.txt", b"y", 12);

    let summary = DuplicateFinder::new(FinderConfig::default(), AssumeYes).run(dir.path());

    assert_eq!(summary.files_deleted, 10);
    assert_eq!(summary.pending, 1);
}

#[test]
fn test_console_confirmer_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_copies(dir.path(), "report.pdf", b"%PDF", 11);

    let mut confirmer = ConsoleConfirmer::new(Cursor::new(b" Y \n".to_vec()), Vec::new());
    let summary = DuplicateFinder::new(FinderConfig::default(), &mut confirmer).run(dir.path());
    let (_, output) = confirmer.into_inner();
    let output = String::from_utf8(output).unwrap();

    assert_eq!(summary.files_deleted, 10);
    assert!(output.contains("Name: report.pdf"));
    assert!(output.contains("Kind: .pdf (PDF Document)"));
    assert!(output.contains("Delete these 10 files"));
}

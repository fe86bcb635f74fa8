//! Detection behavior over real directory trees.

use super::support::{run_default, write_copies, write_file, ScriptedConfirmer};
use chopy::duplicates::{DuplicateFinder, FinderConfig, RunOutcome};
use chopy::scanner::{ScanError, WalkerConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_same_name_same_content_is_one_candidate() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a/x.txt", b"foo");
    write_file(dir.path(), "b/x.txt", b"foo");

    let mut confirmer = ScriptedConfirmer::new([true]);
    let mut finder = DuplicateFinder::new(FinderConfig::default(), &mut confirmer);
    let summary = finder.run(dir.path());

    assert!(matches!(summary.outcome, RunOutcome::Completed));
    assert_eq!(summary.duplicates_found, 1);
    assert_eq!(summary.pending, 1);
    assert_eq!(
        finder.pending().candidates()[0].relative_path,
        PathBuf::from("b/x.txt")
    );
    drop(finder);

    // Batch never filled, so nothing was asked and nothing removed
    assert!(confirmer.prompts.is_empty());
    assert_eq!(summary.bytes_freed, 0);
    assert!(dir.path().join("a/x.txt").exists());
    assert!(dir.path().join("b/x.txt").exists());
}

#[test]
fn test_same_name_different_content_is_ignored() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a/x.txt", b"foo");
    write_file(dir.path(), "b/x.txt", b"bar");
    write_file(dir.path(), "c/x.txt", b"baz");

    let summary = run_default(dir.path(), &mut ScriptedConfirmer::declining());

    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.duplicates_found, 0);
}

#[test]
fn test_distinct_names_never_match() {
    let dir = TempDir::new().unwrap();
    for i in 0..25 {
        write_file(dir.path(), &format!("d/file{i}.txt"), b"identical");
    }

    let summary = run_default(dir.path(), &mut ScriptedConfirmer::declining());

    assert_eq!(summary.files_scanned, 25);
    assert_eq!(summary.duplicates_found, 0);
    assert_eq!(summary.batches_flushed, 0);
}

#[test]
fn test_first_seen_baseline_is_kept() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a/notes.md", b"original");
    write_file(dir.path(), "b/notes.md", b"edited");
    write_file(dir.path(), "c/notes.md", b"original");
    write_file(dir.path(), "d/notes.md", b"edited");

    let mut confirmer = ScriptedConfirmer::declining();
    let mut finder = DuplicateFinder::new(FinderConfig::default(), &mut confirmer);
    let summary = finder.run(dir.path());

    // Only c matches the baseline from a; b and d match each other only
    assert_eq!(summary.duplicates_found, 1);
    assert_eq!(
        finder.pending().candidates()[0].relative_path,
        PathBuf::from("c/notes.md")
    );
}

#[test]
fn test_empty_same_named_files_are_flagged() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "one/.gitkeep", b"");
    write_file(dir.path(), "two/.gitkeep", b"");

    let summary = run_default(dir.path(), &mut ScriptedConfirmer::declining());

    assert_eq!(summary.duplicates_found, 1);
}

#[test]
fn test_min_size_skips_small_files() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "one/.gitkeep", b"");
    write_file(dir.path(), "two/.gitkeep", b"");

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(false, false, Some(1)));
    let summary = DuplicateFinder::new(config, ScriptedConfirmer::declining()).run(dir.path());

    assert_eq!(summary.files_scanned, 0);
    assert_eq!(summary.duplicates_found, 0);
}

#[test]
fn test_skip_hidden() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), ".cache/x.txt", b"foo");
    write_file(dir.path(), "b/x.txt", b"foo");

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(false, true, None));
    let summary = DuplicateFinder::new(config, ScriptedConfirmer::declining()).run(dir.path());

    assert_eq!(summary.files_scanned, 1);
    assert_eq!(summary.duplicates_found, 0);
}

#[test]
fn test_directories_are_counted_not_hashed() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a/b/c/x.txt", b"foo");

    let summary = run_default(dir.path(), &mut ScriptedConfirmer::declining());

    assert_eq!(summary.directories_visited, 3);
    assert_eq!(summary.files_scanned, 1);
}

#[test]
fn test_nonexistent_root_fails() {
    let dir = TempDir::new().unwrap();
    let summary = run_default(&dir.path().join("missing"), &mut ScriptedConfirmer::declining());

    assert!(matches!(summary.outcome, RunOutcome::Failed(ScanError::NotFound(_))));
    assert_eq!(summary.files_scanned, 0);
    assert_eq!(summary.bytes_freed, 0);
}

#[test]
fn test_file_root_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "plain.txt", b"x");

    let summary = run_default(&file, &mut ScriptedConfirmer::declining());

    assert!(matches!(
        summary.outcome,
        RunOutcome::Failed(ScanError::NotADirectory(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a/x.txt", b"foo");
    let locked = write_file(dir.path(), "b/x.txt", b"foo");
    write_file(dir.path(), "c/x.txt", b"foo");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to observe in that case
    if fs::read(&locked).is_ok() {
        return;
    }

    let summary = run_default(dir.path(), &mut ScriptedConfirmer::declining());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert!(matches!(summary.outcome, RunOutcome::Completed));
    assert_eq!(summary.hash_failures, 1);
    assert_eq!(summary.duplicates_found, 1);
}

#[test]
fn test_fifteen_copies_prompt_once() {
    let dir = TempDir::new().unwrap();
    write_copies(dir.path(), "x.txt", b"same", 15);

    let mut confirmer = ScriptedConfirmer::declining();
    let summary = run_default(dir.path(), &mut confirmer);

    assert_eq!(summary.duplicates_found, 14);
    assert_eq!(confirmer.prompt_sizes(), vec![10]);
    assert_eq!(summary.pending, 4);
}

#[cfg(unix)]
#[test]
fn test_followed_directory_link_never_deletes_only_copy() {
    use chopy::actions::AssumeYes;

    let dir = TempDir::new().unwrap();
    let original = write_file(dir.path(), "a/x.txt", b"only copy");
    std::os::unix::fs::symlink(dir.path().join("a"), dir.path().join("b")).unwrap();

    let config = FinderConfig::default()
        .with_batch_size(1)
        .with_walker_config(WalkerConfig::new(true, false, None));
    let summary = DuplicateFinder::new(config, AssumeYes).run(dir.path());

    assert!(matches!(summary.outcome, RunOutcome::Completed));
    assert_eq!(summary.files_scanned, 1);
    assert_eq!(summary.duplicates_found, 0);
    assert_eq!(summary.bytes_freed, 0);
    assert!(original.exists());
}

#[cfg(unix)]
#[test]
fn test_hardlinks_are_not_duplicates() {
    use chopy::actions::AssumeYes;

    let dir = TempDir::new().unwrap();
    let original = write_file(dir.path(), "a/x.txt", b"shared inode");
    fs::create_dir(dir.path().join("b")).unwrap();
    fs::hard_link(&original, dir.path().join("b/x.txt")).unwrap();

    let config = FinderConfig::default().with_batch_size(1);
    let summary = DuplicateFinder::new(config, AssumeYes).run(dir.path());

    assert_eq!(summary.duplicates_found, 0);
    assert!(dir.path().join("b/x.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_followed_file_link_frees_nothing() {
    use chopy::actions::AssumeYes;

    let dir = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    write_file(dir.path(), "a/x.txt", b"payload");
    let target = write_file(outside.path(), "x.txt", b"payload");
    fs::create_dir(dir.path().join("b")).unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("b/x.txt")).unwrap();

    let config = FinderConfig::default()
        .with_batch_size(1)
        .with_walker_config(WalkerConfig::new(true, false, None));
    let summary = DuplicateFinder::new(config, AssumeYes).run(dir.path());

    // The link is removed, its target is not, so no space is released
    assert_eq!(summary.files_deleted, 1);
    assert_eq!(summary.bytes_freed, 0);
    assert!(target.exists());
    assert!(fs::symlink_metadata(dir.path().join("b/x.txt")).is_err());
}

#[cfg(unix)]
#[test]
fn test_undecodable_names_stay_distinct() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    let first = dir.path().join("a").join(OsStr::from_bytes(b"x\xff"));
    let second = dir.path().join("b").join(OsStr::from_bytes(b"x\xfe"));
    // Some filesystems only accept UTF-8 names
    if fs::write(&first, b"same").is_err() || fs::write(&second, b"same").is_err() {
        return;
    }

    let summary = run_default(dir.path(), &mut ScriptedConfirmer::declining());

    assert_eq!(summary.files_scanned, 2);
    assert_eq!(summary.duplicates_found, 0);
}

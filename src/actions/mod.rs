//! File actions module.
//!
//! This module provides functionality for:
//! - Asking the operator to approve a batch of duplicates
//! - Deleting approved duplicates (unlink or system trash)
//! - Accounting for the space freed
//!
//! # Confirmation
//!
//! ```no_run
//! use chopy::actions::{Confirmer, ConsoleConfirmer};
//! use chopy::duplicates::DuplicateBatch;
//!
//! let mut confirmer = ConsoleConfirmer::stdio();
//! let approved = confirmer.confirm(&DuplicateBatch::new());
//! ```
//!
//! # Deletion
//!
//! Deletion is best-effort: each file is attempted independently and the
//! batch is never rolled back.

pub mod confirm;
pub mod delete;

pub use confirm::{parse_answer, render_batch, AssumeYes, Confirmer, ConsoleConfirmer};
pub use delete::{
    remove_file, BatchDeleteResult, DeleteError, DeleteMode, DeleteResult, DeletionExecutor,
    Removed, RunAccounting,
};

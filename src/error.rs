//! Exit codes.
//!
//! - 0: Success (walk completed, or stopped at the duplicate ceiling)
//! - 1: General error (bad configuration, unexpected failure)
//! - 3: Traversal failed (the walk stopped on a filesystem error)
//!
//! Argument errors are reported by clap, which exits with 2.

/// Exit codes for the chopy application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The run finished normally.
    Success = 0,
    /// An unexpected error occurred before or around the walk.
    GeneralError = 1,
    /// The walk was stopped by a traversal error.
    TraversalFailed = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "CH000",
            Self::GeneralError => "CH001",
            Self::TraversalFailed => "CH003",
        }
    }
}

//! Command-line interface definitions for chopy.
//!
//! # Example
//!
//! ```bash
//! # Walk a directory and review same-named duplicates ten at a time
//! chopy ~/Documents
//!
//! # Move approved duplicates to the system trash instead of unlinking
//! chopy --trash ~/Documents
//!
//! # Ignore tiny files and smaller batches
//! chopy --min-size 1KiB --batch-size 5 ~/Documents
//!
//! # Verbose mode for debugging
//! chopy -vv ~/Documents
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Interactive remover of same-named duplicate files.
///
/// chopy walks a directory tree, remembers the content of the first file seen
/// under each name, and flags later files with the same name and identical
/// content. Every ten duplicates it lists them and asks before deleting.
#[derive(Debug, Parser)]
#[command(name = "chopy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (relative paths resolve against the configured base directory)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and prompts
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Duplicates listed per confirmation prompt
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Stop after this many duplicates have been found
    #[arg(long, value_name = "N")]
    pub max_duplicates: Option<usize>,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Follow symbolic links during the walk
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Move approved duplicates to the system trash instead of unlinking them
    #[arg(long)]
    pub trash: bool,

    /// Approve every batch without asking
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use chopy::cli::parse_size;
///
/// assert_eq!(parse_size("512").unwrap(), 512);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("2MB").unwrap(), 2_000_000);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1 << 10,
        "MB" | "M" => 1_000_000,
        "MIB" => 1 << 20,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1 << 30,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1 << 40,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

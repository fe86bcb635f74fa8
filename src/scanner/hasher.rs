//! Content fingerprinting with SHA-256.
//!
//! # Overview
//!
//! A fingerprint identifies a file's full byte content. The file is streamed
//! through SHA-256 and the resulting digest is hashed once more; the stored
//! fingerprint is that second digest. Re-hashing does not change which files
//! compare equal, it only fixes the numeric value so fingerprints line up
//! with those produced by earlier releases.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::HashError;

/// 32-byte content fingerprint.
pub type Fingerprint = [u8; 32];

/// Default read buffer for streaming file content.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming file fingerprinter.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    buffer_size: usize,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Fingerprinter {
    /// Create a fingerprinter with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Use a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Fingerprint the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read to the end.
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| map_io_error(path, e))?;
        let reader = BufReader::with_capacity(self.buffer_size, file);
        self.fingerprint_reader(reader)
            .map_err(|e| map_io_error(path, e))
    }

    /// Fingerprint everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates read errors from `reader`.
    pub fn fingerprint_reader<R: Read>(&self, mut reader: R) -> io::Result<Fingerprint> {
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher)?;
        let digest = hasher.finalize();
        Ok(Sha256::digest(digest).into())
    }

    /// Fingerprint an in-memory byte slice.
    #[must_use]
    pub fn fingerprint_bytes(&self, bytes: &[u8]) -> Fingerprint {
        Sha256::digest(Sha256::digest(bytes)).into()
    }
}

fn map_io_error(path: &Path, error: io::Error) -> HashError {
    match error.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

/// Lowercase hex rendering of a fingerprint.
#[must_use]
pub fn fingerprint_to_hex(fingerprint: &Fingerprint) -> String {
    use std::fmt::Write;

    fingerprint
        .iter()
        .fold(String::with_capacity(64), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

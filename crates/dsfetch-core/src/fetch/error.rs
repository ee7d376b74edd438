//! Fetch error type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by the dataset fetcher.
///
/// `ChecksumMismatch` is the data-integrity failure: the bytes on disk do not
/// hash to what the metadata promises, so they must not be trusted.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("GET {url} failed")]
    Transfer {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },

    #[error(
        "SHA-256 of {} is {actual}, metadata lists {expected}: \
         downloaded data is corrupted or untrusted",
        path.display()
    )]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl FetchError {
    /// True for the data-integrity failure (checksum mismatch).
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, FetchError::ChecksumMismatch { .. })
    }
}

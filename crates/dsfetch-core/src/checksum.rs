//! SHA-256 checksums for downloaded dataset files.
//!
//! Digests are computed after the transfer completes, streaming the file from
//! disk so memory use stays bounded for large archives.

use crate::fetch::FetchError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Checks `path` against an expected hex digest (case-insensitive).
/// Returns the actual digest on match.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<String, FetchError> {
    let actual = sha256_path(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(FetchError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.trim().to_ascii_lowercase(),
            actual,
        });
    }
    Ok(actual)
}

//! Idempotent, checksum-verified download of raw dataset files.
//!
//! A file that already exists at `target_dir/filename` is trusted as-is: no
//! network access and no re-hashing. A missing file is fetched with a single
//! GET into `filename.part`, renamed into place once the transfer completes,
//! and its SHA-256 compared against the metadata before the path is handed
//! back. An interrupted run therefore never leaves a truncated file under the
//! final name.

mod error;
mod single;

pub use error::FetchError;
pub use single::{temp_path_for, TEMP_SUFFIX};

use crate::checksum;
use crate::metadata::DatasetMetadata;
use std::fs;
use std::path::{Path, PathBuf};

/// libcurl knobs applied to the dataset GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub max_redirections: u32,
    /// Receive-speed cap in bytes per second.
    pub max_recv_speed: Option<u64>,
    pub buffer_size: Option<usize>,
    pub user_agent: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_redirections: 10,
            max_recv_speed: None,
            buffer_size: None,
            user_agent: None,
        }
    }
}

/// Ensures the dataset file described by `metadata` exists under `target_dir`.
/// Uses default transfer options; see [`ensure_downloaded_with`].
pub fn ensure_downloaded(
    metadata: &DatasetMetadata,
    target_dir: &Path,
) -> Result<PathBuf, FetchError> {
    ensure_downloaded_with(metadata, target_dir, &FetchOptions::default())
}

/// Ensures the dataset file described by `metadata` exists under `target_dir`
/// and returns its path.
///
/// Creates `target_dir` (and parents) if needed. If the file is already present
/// it is returned untouched. Otherwise it is downloaded and verified; on a
/// checksum mismatch the downloaded file stays on disk and
/// [`FetchError::ChecksumMismatch`] is returned.
pub fn ensure_downloaded_with(
    metadata: &DatasetMetadata,
    target_dir: &Path,
    opts: &FetchOptions,
) -> Result<PathBuf, FetchError> {
    fs::create_dir_all(target_dir).map_err(|source| FetchError::CreateDir {
        path: target_dir.to_path_buf(),
        source,
    })?;

    let path = target_dir.join(metadata.filename());
    if path.exists() {
        tracing::debug!("{} already present, skipping download", path.display());
        return Ok(path);
    }

    tracing::info!(url = %metadata.url(), "downloading raw dataset to {}", path.display());
    let bytes = single::download_to_path(metadata.url(), &path, opts)?;
    tracing::info!(bytes, "computing SHA-256 of {}", path.display());

    match checksum::verify_sha256(&path, metadata.sha256()) {
        Ok(digest) => {
            tracing::debug!(sha256 = %digest, "checksum verified");
            Ok(path)
        }
        Err(e) => {
            tracing::warn!("{}", e);
            Err(e)
        }
    }
}

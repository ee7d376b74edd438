//! Single-stream HTTP GET into a local file.
//!
//! The body is written to `<dest>.part` and renamed onto `dest` only after the
//! transfer completes with a 2xx status, so `dest` never holds a truncated
//! body. Blocking; no transfer timeout and no retry.

use super::{FetchError, FetchOptions};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the rename onto the final name.
pub const TEMP_SUFFIX: &str = ".part";

/// `<dest>.part`, next to `dest`.
pub fn temp_path_for(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(TEMP_SUFFIX);
    dest.with_file_name(name)
}

/// Downloads `url` with one GET and moves the complete body to `dest`.
/// Returns the number of bytes written.
///
/// A `.part` file left by an earlier interrupted run is discarded first. On
/// transfer or HTTP failure the `.part` file is removed and `dest` is not created.
pub(crate) fn download_to_path(
    url: &str,
    dest: &Path,
    opts: &FetchOptions,
) -> Result<u64, FetchError> {
    let temp = temp_path_for(dest);
    match fs::remove_file(&temp) {
        Ok(()) => tracing::debug!("discarded stale {}", temp.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(FetchError::Io { path: temp, source }),
    }

    let written = match transfer(url, &temp, opts) {
        Ok(n) => n,
        Err(e) => {
            if let Err(rm) = fs::remove_file(&temp) {
                if rm.kind() != io::ErrorKind::NotFound {
                    tracing::warn!("could not remove partial file {}: {}", temp.display(), rm);
                }
            }
            return Err(e);
        }
    };

    fs::rename(&temp, dest).map_err(|source| FetchError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    Ok(written)
}

fn transfer(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let curl_err = |source: curl::Error| FetchError::Transfer {
        url: url.to_string(),
        source,
    };
    let io_err = |source: io::Error| FetchError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let mut file = File::create(dest).map_err(io_err)?;
    let mut written: u64 = 0;
    let mut write_failure: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.get(true).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.max_redirections(opts.max_redirections).map_err(curl_err)?;
    if let Some(speed) = opts.max_recv_speed {
        easy.max_recv_speed(speed).map_err(curl_err)?;
    }
    if let Some(sz) = opts.buffer_size {
        easy.buffer_size(sz).map_err(curl_err)?;
    }
    if let Some(ua) = &opts.user_agent {
        easy.useragent(ua).map_err(curl_err)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_failure = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(curl_err)?;
        transfer.perform()
    };

    if let Some(e) = write_failure {
        return Err(io_err(e));
    }
    performed.map_err(curl_err)?;

    let status = easy.response_code().map_err(curl_err)?;
    if !(200..300).contains(&status) {
        return Err(FetchError::Http {
            url: url.to_string(),
            status,
        });
    }

    file.sync_all().map_err(io_err)?;
    Ok(written)
}

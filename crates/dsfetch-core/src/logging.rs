//! Tracing setup for the `dsfetch` binary.
//!
//! Events are appended to `$XDG_STATE_HOME/dsfetch/dsfetch.log` so stdout
//! stays reserved for dataset summaries. `RUST_LOG` overrides the default
//! filter. If the log file cannot be opened the binary switches to
//! [`init_logging_stderr`].

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,dsfetch=debug,dsfetch_core=debug";
const LOG_FILE_NAME: &str = "dsfetch.log";

/// Where file logging writes: `dsfetch.log` under the XDG state home.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dsfetch")?;
    Ok(xdg_dirs.get_state_home().join(LOG_FILE_NAME))
}

/// Opens `path` for appending, creating parent directories first.
fn open_append(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

fn install<W>(writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already set: {}", e))
}

/// Routes tracing events to the log file and returns its path.
///
/// Fails when the state directory or file cannot be opened; nothing is
/// installed in that case, so the caller can still fall back to stderr.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_append(&path).with_context(|| format!("open log {}", path.display()))?;
    install(Mutex::new(file))?;
    tracing::info!("logging to {}", path.display());
    Ok(path)
}

/// Routes tracing events to stderr. A no-op if a subscriber is already installed.
pub fn init_logging_stderr() {
    let _ = install(io::stderr);
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::fetch::FetchOptions;

/// Default number of records per batch handed to the training loop.
pub const DEFAULT_BATCH_SIZE: usize = 128;

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_max_redirections() -> u32 {
    10
}

/// Transfer tuning (optional `[download]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Maximum number of HTTP redirects to follow.
    #[serde(default = "default_max_redirections")]
    pub max_redirections: u32,
    /// Optional receive-speed cap in bytes per second (None = no cap).
    #[serde(default)]
    pub max_recv_speed: Option<u64>,
    /// Optional libcurl receive buffer size in bytes (None = library default).
    #[serde(default)]
    pub buffer_size: Option<usize>,
    /// Optional `User-Agent` header sent with the GET.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_redirections: default_max_redirections(),
            max_recv_speed: None,
            buffer_size: None,
            user_agent: None,
        }
    }
}

impl From<&DownloadConfig> for FetchOptions {
    fn from(cfg: &DownloadConfig) -> Self {
        FetchOptions {
            max_redirections: cfg.max_redirections,
            max_recv_speed: cfg.max_recv_speed,
            buffer_size: cfg.buffer_size,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Global configuration loaded from `~/.config/dsfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DsfetchConfig {
    /// Root of the dataset tree. None = `$XDG_DATA_HOME/dsfetch`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Default batch size when `--batch-size` is not given.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Optional transfer tuning; if missing, built-in defaults are used.
    #[serde(default)]
    pub download: Option<DownloadConfig>,
}

impl Default for DsfetchConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            batch_size: DEFAULT_BATCH_SIZE,
            download: None,
        }
    }
}

impl DsfetchConfig {
    /// Transfer options, falling back to defaults when `[download]` is absent.
    pub fn fetch_options(&self) -> FetchOptions {
        self.download
            .as_ref()
            .map(FetchOptions::from)
            .unwrap_or_default()
    }

    /// Resolve the dataset root: configured `data_dir`, else the XDG data home.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let xdg_dirs = xdg::BaseDirectories::with_prefix("dsfetch")?;
                Ok(xdg_dirs.get_data_home())
            }
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dsfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DsfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DsfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: DsfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

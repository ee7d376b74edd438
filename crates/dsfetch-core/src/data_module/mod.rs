//! Data modules: the prepare/setup lifecycle driven by the loader harness.
//!
//! A data module declares its own command-line options (`Args`), is built
//! from them plus the shared [`ModuleContext`], acquires its raw data in
//! [`DataModule::prepare_data`], materializes it in [`DataModule::setup`], and
//! summarizes itself through `Display`.

mod lines;
mod split;

pub use lines::{LinesArgs, LinesDataModule};
pub use split::{SplitDataset, SplitFractions};

use crate::config::DsfetchConfig;
use crate::fetch::FetchOptions;
use anyhow::Result;
use clap::Args;
use std::fmt;
use std::path::PathBuf;

pub trait DataModule: fmt::Display + Sized {
    /// Module-specific command-line options.
    type Args: Args;

    fn from_args(args: Self::Args, ctx: ModuleContext) -> Result<Self>;

    /// Acquire raw data (download and verify). Must be safe to call repeatedly.
    fn prepare_data(&mut self) -> Result<()>;

    /// Load prepared data into memory.
    fn setup(&mut self) -> Result<()>;

    fn is_set_up(&self) -> bool;
}

// Options shared by every data module.
#[derive(Debug, Clone, Default, Args)]
pub struct DataModuleArgs {
    /// Records per batch [default: batch_size from config.toml, 128]
    #[arg(long, value_name = "N", value_parser = parse_batch_size)]
    pub batch_size: Option<usize>,

    /// Root directory for datasets [default: data_dir from config.toml, else XDG data home]
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

fn parse_batch_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("batch size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Resolved settings handed to a data module at construction.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    pub data_dir: PathBuf,
    pub batch_size: usize,
    pub fetch: FetchOptions,
}

impl ModuleContext {
    /// Command-line values win over config.toml.
    pub fn resolve(args: &DataModuleArgs, cfg: &DsfetchConfig) -> Result<Self> {
        let data_dir = match &args.data_dir {
            Some(dir) => dir.clone(),
            None => cfg.resolve_data_dir()?,
        };
        let batch_size = args.batch_size.unwrap_or(cfg.batch_size);
        if batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }
        Ok(Self {
            data_dir,
            batch_size,
            fetch: cfg.fetch_options(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_override_config() {
        let cfg = DsfetchConfig {
            data_dir: Some(PathBuf::from("/cfg/data")),
            batch_size: 64,
            download: None,
        };
        let args = DataModuleArgs {
            batch_size: Some(8),
            data_dir: Some(PathBuf::from("/cli/data")),
        };
        let ctx = ModuleContext::resolve(&args, &cfg).unwrap();
        assert_eq!(ctx.batch_size, 8);
        assert_eq!(ctx.data_dir, PathBuf::from("/cli/data"));
    }

    #[test]
    fn config_fills_missing_args() {
        let cfg = DsfetchConfig {
            data_dir: Some(PathBuf::from("/cfg/data")),
            batch_size: 64,
            download: None,
        };
        let ctx = ModuleContext::resolve(&DataModuleArgs::default(), &cfg).unwrap();
        assert_eq!(ctx.batch_size, 64);
        assert_eq!(ctx.data_dir, PathBuf::from("/cfg/data"));
        assert_eq!(ctx.fetch, FetchOptions::default());
    }

    #[test]
    fn zero_batch_size_in_config_is_rejected() {
        let cfg = DsfetchConfig {
            data_dir: Some(PathBuf::from("/cfg/data")),
            batch_size: 0,
            download: None,
        };
        assert!(ModuleContext::resolve(&DataModuleArgs::default(), &cfg).is_err());
    }

    #[test]
    fn batch_size_parser() {
        assert_eq!(parse_batch_size("32"), Ok(32));
        assert!(parse_batch_size("0").is_err());
        assert!(parse_batch_size("-1").is_err());
    }
}

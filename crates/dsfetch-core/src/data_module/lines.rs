//! Data module over a newline-delimited raw file.
//!
//! Each non-empty line is one record. The raw file is described by a TOML
//! metadata document and lands under `<data_dir>/raw/<document stem>/`.

use super::{DataModule, ModuleContext, SplitDataset, SplitFractions};
use crate::fetch;
use crate::metadata::DatasetMetadata;
use anyhow::{Context, Result};
use clap::Args;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Args)]
pub struct LinesArgs {
    /// TOML metadata document (url, filename, sha256) for the raw file
    #[arg(long, value_name = "PATH")]
    pub metadata: PathBuf,

    /// Fraction of records held out for validation
    #[arg(long, value_name = "F", default_value_t = 0.1)]
    pub val_fraction: f64,

    /// Fraction of records held out for testing
    #[arg(long, value_name = "F", default_value_t = 0.0)]
    pub test_fraction: f64,
}

#[derive(Debug)]
pub struct LinesDataModule {
    name: String,
    metadata: DatasetMetadata,
    raw_dir: PathBuf,
    ctx: ModuleContext,
    fractions: SplitFractions,
    data: Option<SplitDataset<String>>,
}

impl LinesDataModule {
    /// Builds the module directly, without going through command-line parsing.
    pub fn new(
        name: impl Into<String>,
        metadata: DatasetMetadata,
        fractions: SplitFractions,
        ctx: ModuleContext,
    ) -> Self {
        let name = name.into();
        let raw_dir = ctx.data_dir.join("raw").join(&name);
        Self {
            name,
            metadata,
            raw_dir,
            ctx,
            fractions,
            data: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the raw file lives (whether or not it has been fetched yet).
    pub fn raw_path(&self) -> PathBuf {
        self.raw_dir.join(self.metadata.filename())
    }

    pub fn batch_size(&self) -> usize {
        self.ctx.batch_size
    }

    /// The split records; None until `setup` has run.
    pub fn dataset(&self) -> Option<&SplitDataset<String>> {
        self.data.as_ref()
    }
}

fn dataset_name(metadata_path: &Path) -> String {
    metadata_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("dataset")
        .to_string()
}

fn read_records(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("open {} (has prepare_data run?)", path.display()))?;
    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        if !line.trim().is_empty() {
            records.push(line);
        }
    }
    Ok(records)
}

impl DataModule for LinesDataModule {
    type Args = LinesArgs;

    fn from_args(args: LinesArgs, ctx: ModuleContext) -> Result<Self> {
        let metadata = DatasetMetadata::load(&args.metadata)?;
        let fractions = SplitFractions::new(args.val_fraction, args.test_fraction)?;
        Ok(Self::new(dataset_name(&args.metadata), metadata, fractions, ctx))
    }

    fn prepare_data(&mut self) -> Result<()> {
        fetch::ensure_downloaded_with(&self.metadata, &self.raw_dir, &self.ctx.fetch)
            .with_context(|| format!("fetch raw data for {}", self.name))?;
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let records = read_records(&self.raw_path())?;
        let data = SplitDataset::split(records, self.fractions);
        let (train, val, test) = data.sizes();
        tracing::debug!(train, val, test, "{} set up", self.name);
        self.data = Some(data);
        Ok(())
    }

    fn is_set_up(&self) -> bool {
        self.data.is_some()
    }
}

impl fmt::Display for LinesDataModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(data) = &self.data else {
            return write!(f, "Lines dataset: {} (not set up)", self.name);
        };
        let (train, val, test) = data.sizes();
        writeln!(f, "Lines dataset: {}", self.name)?;
        writeln!(f, "Raw file: {}", self.raw_path().display())?;
        writeln!(f, "Train/val/test sizes: {}, {}, {}", train, val, test)?;
        write!(
            f,
            "Batch size: {} ({} train batches)",
            self.ctx.batch_size,
            data.num_train_batches(self.ctx.batch_size)
        )
    }
}

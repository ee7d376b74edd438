//! `dsfetch`: fetch, verify, and summarize a newline-delimited dataset.

use anyhow::Result;
use dsfetch_core::data_module::LinesDataModule;
use dsfetch_core::harness;

/// Parses process arguments and runs the lines data module through the harness.
pub fn run() -> Result<()> {
    harness::load_and_report::<LinesDataModule>()
}

/// One-line report for a fatal error, including its cause chain.
pub fn error_line(err: &anyhow::Error) -> String {
    format!("dsfetch error: {:#}", err)
}

//! Loader harness: parse options, build a data module, prepare it, set it up,
//! and print its summary.

use crate::config::{self, DsfetchConfig};
use crate::data_module::{DataModule, DataModuleArgs, ModuleContext};
use anyhow::{Context, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches};
use std::ffi::OsString;
use std::io::{self, Write};

const BIN_NAME: &str = "dsfetch";

/// Command-line parser with the shared data-module options plus those `M` declares.
pub fn command<M: DataModule>() -> Command {
    let cmd = Command::new(BIN_NAME)
        .about("Download, verify, and summarize a training dataset")
        .version(env!("CARGO_PKG_VERSION"));
    M::Args::augment_args(DataModuleArgs::augment_args(cmd))
}

/// Runs `M` against the process arguments and prints its summary to stdout.
///
/// Help and usage errors are reported by clap and exit the process before
/// `~/.config/dsfetch/config.toml` is read or created.
pub fn load_and_report<M: DataModule>() -> Result<()> {
    let matches = command::<M>().get_matches();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run::<M, _>(&matches, &cfg, &mut out)?;
    Ok(())
}

/// Like [`load_and_report`] with explicit arguments, configuration, and output.
/// `args` includes the binary name. Returns the module in its set-up state.
pub fn load_and_report_from<M, I, T, W>(args: I, cfg: &DsfetchConfig, out: &mut W) -> Result<M>
where
    M: DataModule,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let matches = command::<M>().try_get_matches_from(args)?;
    run(&matches, cfg, out)
}

fn run<M: DataModule, W: Write>(
    matches: &ArgMatches,
    cfg: &DsfetchConfig,
    out: &mut W,
) -> Result<M> {
    let common = DataModuleArgs::from_arg_matches(matches)?;
    let module_args = M::Args::from_arg_matches(matches)?;
    let ctx = ModuleContext::resolve(&common, cfg)?;
    tracing::debug!(
        data_dir = %ctx.data_dir.display(),
        batch_size = ctx.batch_size,
        "constructing data module"
    );

    let mut module = M::from_args(module_args, ctx)?;
    module.prepare_data().context("prepare_data failed")?;
    module.setup().context("setup failed")?;
    writeln!(out, "{}", module)?;
    Ok(module)
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use prcband_engine::precision::PrecisionConfig;

use self::{
    band::BandArg, ci::CiArg, pvrandom::PvRandomArg, signif::SignifArg, summary::SummaryArg,
    sweep::SweepArg,
};

mod band;
mod ci;
mod pvrandom;
mod signif;
mod summary;
mod sweep;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Print the threshold sweep table of each classifier
    Sweep(#[clap(flatten)] SweepArg),
    /// Print AUROC, AUPRC and recall at a precision cutoff
    Summary(#[clap(flatten)] SummaryArg),
    /// Sample precision-recall paths and derive confidence bands
    Band(#[clap(flatten)] BandArg),
    /// Compute exact confidence intervals for success/trial counts
    Ci(#[clap(flatten)] CiArg),
    /// Compare classifiers pairwise by AUPRC
    Signif(#[clap(flatten)] SignifArg),
    /// Test each classifier's AUPRC against random scoring
    #[command(name = "pvrandom")]
    PvRandom(#[clap(flatten)] PvRandomArg),
}

/// Dataset input and report output shared by dataset commands
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DatasetIoArg {
    /// Dataset JSON file
    dataset: PathBuf,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Precision post-processing switches
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PrecisionArg {
    /// Use raw precision instead of its running maximum
    #[arg(long)]
    no_monotonized: bool,
    /// Rescale precision to a 50% class prior
    #[arg(long)]
    balanced: bool,
}

impl PrecisionArg {
    fn config(&self) -> PrecisionConfig {
        PrecisionConfig {
            monotonized: !self.no_monotonized,
            balanced: self.balanced,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Sweep(arg) => sweep::run(&arg)?,
        Mode::Summary(arg) => summary::run(&arg)?,
        Mode::Band(arg) => band::run(&arg)?,
        Mode::Ci(arg) => ci::run(&arg)?,
        Mode::Signif(arg) => signif::run(&arg)?,
        Mode::PvRandom(arg) => pvrandom::run(&arg)?,
    }
    Ok(())
}

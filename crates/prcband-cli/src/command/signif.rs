use anyhow::Context;
use prcband_engine::{
    interval,
    significance::{self, SignificanceConfig, SignificanceReport},
};

use crate::{
    command::{DatasetIoArg, PrecisionArg},
    schema::Report,
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SignifArg {
    #[clap(flatten)]
    io: DatasetIoArg,
    /// Step of the probability ladder and the rate grid
    #[arg(long, default_value_t = interval::DEFAULT_RESOLUTION)]
    resolution: f64,
    #[clap(flatten)]
    precision: PrecisionArg,
}

#[derive(Debug, serde::Serialize)]
struct SignifReport {
    config: SignificanceConfig,
    names: Vec<String>,
    #[serde(flatten)]
    significance: SignificanceReport,
}

pub(crate) fn run(arg: &SignifArg) -> anyhow::Result<()> {
    let SignifArg {
        io,
        resolution,
        precision,
    } = arg;
    let collection = util::read_dataset_file(&io.dataset)?;
    let config = SignificanceConfig {
        resolution: *resolution,
        precision: precision.config(),
    };

    eprintln!(
        "Building AUPRC ladders for {} classifiers...",
        collection.len()
    );
    let significance = significance::auprc_significance(&collection, &config)
        .context("Failed to compute AUPRC significance")?;

    for (i, row) in significance.classifiers.iter().enumerate() {
        eprintln!(
            "{}: AUPRC {:.4} (95% CI {:.4}-{:.4})",
            row.name, row.auprc, row.ci_lower, row.ci_upper
        );
        for (j, other) in significance.classifiers.iter().enumerate() {
            if i != j {
                eprintln!(
                    "  vs {}: p = {:.4}, log10 LR = {:.3}",
                    other.name,
                    significance.p_values.get(i, j),
                    significance.llr.get(i, j)
                );
            }
        }
    }

    let report = Report::new(
        Some(io.dataset.clone()),
        SignifReport {
            config,
            names: collection.names().map(str::to_owned).collect(),
            significance,
        },
    );
    util::write_report(&report, io.output.as_deref())?;
    Ok(())
}

use std::path::PathBuf;

use prcband_engine::{
    interval::{self, CiTable},
    rate::RateCounts,
};

use crate::{schema::Report, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CiArg {
    /// Success counts, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    successes: Vec<u64>,
    /// Trial counts, comma separated, one per success count
    #[arg(long, value_delimiter = ',', required = true)]
    trials: Vec<u64>,
    /// Quantile probabilities, comma separated
    #[arg(long, value_delimiter = ',', default_value = "0.025,0.975")]
    probabilities: Vec<f64>,
    /// Rate grid step
    #[arg(long, default_value_t = interval::DEFAULT_RESOLUTION)]
    resolution: f64,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
struct CiReport {
    resolution: f64,
    #[serde(flatten)]
    table: CiTable,
}

pub(crate) fn run(arg: &CiArg) -> anyhow::Result<()> {
    let CiArg {
        successes,
        trials,
        probabilities,
        resolution,
        output,
    } = arg;
    anyhow::ensure!(
        successes.len() == trials.len(),
        "--successes has {} values but --trials has {}",
        successes.len(),
        trials.len()
    );

    let counts = successes
        .iter()
        .zip(trials)
        .map(|(&i, &n)| RateCounts::new(i, n))
        .collect::<Vec<_>>();
    let table = interval::exact_ci(&counts, probabilities, *resolution)?;

    let report = Report::new(
        None,
        CiReport {
            resolution: *resolution,
            table,
        },
    );
    util::write_report(&report, output.as_deref())?;
    Ok(())
}

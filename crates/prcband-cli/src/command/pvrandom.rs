use std::time::Instant;

use prcband_engine::null::{self, NullConfig, NullTest};

use crate::{
    command::{DatasetIoArg, PrecisionArg},
    schema::Report,
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PvRandomArg {
    #[clap(flatten)]
    io: DatasetIoArg,
    /// Random scorings per distinct class count
    #[arg(long, default_value_t = null::DEFAULT_CYCLES)]
    cycles: usize,
    #[clap(flatten)]
    precision: PrecisionArg,
    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, serde::Serialize)]
struct PvRandomReport {
    seed: u64,
    config: NullConfig,
    classifiers: Vec<NullTest>,
}

pub(crate) fn run(arg: &PvRandomArg) -> anyhow::Result<()> {
    let PvRandomArg {
        io,
        cycles,
        precision,
        seed,
    } = arg;
    let collection = util::read_dataset_file(&io.dataset)?;
    let config = NullConfig {
        cycles: *cycles,
        precision: precision.config(),
    };
    let (seed, mut rng) = util::seeded_rng(*seed);

    eprintln!("Drawing {cycles} random scorings per class balance (seed {seed})...");
    let start = Instant::now();
    let classifiers = null::random_pvalues(&mut rng, &collection, &config);
    eprintln!("Done in {:.2?}", start.elapsed());
    for test in &classifiers {
        eprintln!(
            "{}: AUPRC {:.4}, p = {:.4}",
            test.name, test.auprc, test.p_value
        );
    }

    let report = Report::new(
        Some(io.dataset.clone()),
        PvRandomReport {
            seed,
            config,
            classifiers,
        },
    );
    util::write_report(&report, io.output.as_deref())?;
    Ok(())
}

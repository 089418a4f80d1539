use std::time::Instant;

use anyhow::Context;
use prcband_engine::{
    band::{self, BandConfig, BandRow},
    path::{self, PathSamplerConfig},
    sampler::SamplingPolicy,
};

use crate::{
    command::DatasetIoArg,
    schema::Report,
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BandArg {
    #[clap(flatten)]
    io: DatasetIoArg,
    /// Number of sampled paths per classifier
    #[arg(long, default_value_t = path::DEFAULT_SAMPLES)]
    samples: usize,
    /// Number of recall bins
    #[arg(long, default_value_t = band::DEFAULT_BINS)]
    bins: usize,
    /// Lower percentile of precision in each bin
    #[arg(long, default_value_t = band::DEFAULT_LOWER_PERCENTILE)]
    lower: f64,
    /// Upper percentile of precision in each bin
    #[arg(long, default_value_t = band::DEFAULT_UPPER_PERCENTILE)]
    upper: f64,
    /// Sample each row independently instead of along monotone paths
    #[arg(long)]
    no_monotonized: bool,
    /// Rate sampler (quick or accurate)
    #[arg(long, default_value = "quick")]
    sampler: SamplingPolicy,
    /// Only process the named classifier
    #[arg(long)]
    classifier: Option<String>,
    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, serde::Serialize)]
struct BandReport {
    seed: u64,
    sampler: PathSamplerConfig,
    band: BandConfig,
    classifiers: Vec<BandEntry>,
}

#[derive(Debug, serde::Serialize)]
struct BandEntry {
    name: String,
    rows: Vec<BandRow>,
}

pub(crate) fn run(arg: &BandArg) -> anyhow::Result<()> {
    let BandArg {
        io,
        samples,
        bins,
        lower,
        upper,
        no_monotonized,
        sampler,
        classifier,
        seed,
    } = arg;
    anyhow::ensure!(*bins > 0, "--bins must be positive");
    anyhow::ensure!(
        (0.0..=100.0).contains(lower) && (0.0..=100.0).contains(upper) && lower <= upper,
        "percentiles must satisfy 0 <= lower <= upper <= 100"
    );

    let collection = util::read_dataset_file(&io.dataset)?;
    if let Some(name) = classifier {
        anyhow::ensure!(
            collection.get(name).is_some(),
            "Classifier not found in dataset: {name}"
        );
    }

    let sampler_config = PathSamplerConfig {
        samples: *samples,
        monotonized: !no_monotonized,
        policy: *sampler,
    };
    let band_config = BandConfig {
        bins: *bins,
        lower_percentile: *lower,
        upper_percentile: *upper,
    };
    let (seed, mut rng) = util::seeded_rng(*seed);
    log::info!("sampling with seed {seed}");

    let mut classifiers = vec![];
    for entry in collection
        .iter()
        .filter(|c| classifier.as_ref().is_none_or(|name| c.name() == name.as_str()))
    {
        eprintln!(
            "Sampling {} paths over {} thresholds for {}...",
            samples,
            entry.table().rows().len() - 1,
            entry.name()
        );
        let start = Instant::now();
        let ensemble = path::sample_paths(&mut rng, entry.table(), &sampler_config)
            .with_context(|| format!("Failed to sample paths for {}", entry.name()))?;
        let band = band::infer_band(&ensemble, &band_config);
        eprintln!("  done in {:.2?}", start.elapsed());
        classifiers.push(BandEntry {
            name: entry.name().to_owned(),
            rows: band.rows().to_vec(),
        });
    }

    let report = Report::new(
        Some(io.dataset.clone()),
        BandReport {
            seed,
            sampler: sampler_config,
            band: band_config,
            classifiers,
        },
    );
    util::write_report(&report, io.output.as_deref())?;
    Ok(())
}

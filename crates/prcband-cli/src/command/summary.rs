use prcband_engine::{precision::PrecisionConfig, threshold::ThresholdRange};

use crate::{
    command::{DatasetIoArg, PrecisionArg},
    schema::Report,
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummaryArg {
    #[clap(flatten)]
    io: DatasetIoArg,
    /// Precision the operating point must exceed
    #[arg(long, default_value_t = 0.9)]
    cutoff: f64,
    #[clap(flatten)]
    precision: PrecisionArg,
}

#[derive(Debug, serde::Serialize)]
struct SummaryReport {
    cutoff: f64,
    precision: PrecisionConfig,
    classifiers: Vec<SummaryEntry>,
}

#[derive(Debug, serde::Serialize)]
struct SummaryEntry {
    name: String,
    auroc: f64,
    auprc: f64,
    recall_at_cutoff: Option<f64>,
    threshold_range: Option<ThresholdRange>,
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let SummaryArg {
        io,
        cutoff,
        precision,
    } = arg;
    let config = precision.config();
    let collection = util::read_dataset_file(&io.dataset)?;

    let classifiers = collection
        .iter()
        .map(|classifier| {
            let table = classifier.table();
            SummaryEntry {
                name: classifier.name().to_owned(),
                auroc: table.auroc(),
                auprc: table.auprc(&config),
                recall_at_cutoff: table.recall_at_precision(*cutoff, &config),
                threshold_range: classifier.threshold_range(*cutoff, &config),
            }
        })
        .collect::<Vec<_>>();

    for entry in &classifiers {
        eprintln!(
            "{}: AUROC {:.4}, AUPRC {:.4}, threshold range {}",
            entry.name,
            entry.auroc,
            entry.auprc,
            entry
                .threshold_range
                .map_or_else(|| "none".to_owned(), |range| range.to_string())
        );
    }

    let report = Report::new(
        Some(io.dataset.clone()),
        SummaryReport {
            cutoff: *cutoff,
            precision: config,
            classifiers,
        },
    );
    util::write_report(&report, io.output.as_deref())?;
    Ok(())
}

use prcband_engine::{Orientation, SweepRow};

use crate::{
    command::DatasetIoArg,
    schema::Report,
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SweepArg {
    #[clap(flatten)]
    io: DatasetIoArg,
}

#[derive(Debug, serde::Serialize)]
struct SweepReport<'a> {
    classifiers: Vec<SweepEntry<'a>>,
}

#[derive(Debug, serde::Serialize)]
struct SweepEntry<'a> {
    name: &'a str,
    orientation: Orientation,
    positives: u64,
    negatives: u64,
    prior: f64,
    rows: &'a [SweepRow],
}

pub(crate) fn run(arg: &SweepArg) -> anyhow::Result<()> {
    let SweepArg { io } = arg;
    let collection = util::read_dataset_file(&io.dataset)?;

    let classifiers = collection
        .iter()
        .map(|classifier| {
            let table = classifier.table();
            SweepEntry {
                name: classifier.name(),
                orientation: classifier.orientation(),
                positives: table.positives(),
                negatives: table.negatives(),
                prior: table.prior(),
                rows: table.rows(),
            }
        })
        .collect();

    let report = Report::new(Some(io.dataset.clone()), SweepReport { classifiers });
    util::write_report(&report, io.output.as_deref())?;
    Ok(())
}

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use prcband_engine::{
    ClassifierCollection,
    dataset::{Dataset, RawDataset},
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

/// Write a report as pretty JSON to `path`, or to stdout without one
pub fn write_report<T>(report: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let Some(path) = path else {
        return write_json(io::stdout().lock(), report).context("Failed to write report to stdout");
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_json(BufWriter::new(file), report)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    eprintln!("Report written to {}", path.display());
    Ok(())
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read a dataset file and sweep every classifier in it
///
/// # Errors
///
/// Returns error if the file cannot be read, or if labels and scores have
/// the wrong types or lengths
pub fn read_dataset_file<P>(path: P) -> anyhow::Result<ClassifierCollection>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let raw: RawDataset = read_json_file("dataset", path)?;
    let collection = Dataset::try_from(raw)
        .with_context(|| format!("Invalid dataset: {}", path.display()))?
        .into_collection()
        .with_context(|| format!("Invalid classifiers in dataset: {}", path.display()))?;
    eprintln!(
        "Loaded {} classifiers over {} labels from {}",
        collection.len(),
        collection.truth().len(),
        path.display()
    );
    Ok(collection)
}

/// Seeded generator for sampling commands
///
/// Without an explicit seed, one is drawn from the thread RNG. The seed is
/// returned so reports can record it.
pub fn seeded_rng(seed: Option<u64>) -> (u64, Pcg32) {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    (seed, Pcg32::seed_from_u64(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Sample {
        name: String,
        auprc: f64,
    }

    #[test]
    fn test_json_ends_with_newline() {
        let mut buf = vec![];
        write_json(&mut buf, &[1, 2]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("]\n"), "{text:?}");
    }

    #[test]
    fn test_report_file_reads_back() {
        let path = std::env::temp_dir().join(format!("prcband-util-{}.json", std::process::id()));
        let sample = Sample {
            name: "m".to_owned(),
            auprc: 0.75,
        };
        write_report(&sample, Some(&path)).unwrap();
        let back: Sample = read_json_file("report", &path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_missing_output_directory() {
        let path = std::env::temp_dir().join("prcband-no-such-dir").join("out.json");
        let err = write_report(&1, Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create output file"), "{err}");
    }
}

//! Empirical p-values of AUPRC against random scoring.
//!
//! The null distribution for a classifier is the AUPRC of uniformly random
//! scores on a truth vector with the same number of positives and negatives
//! as the classifier's scored samples. Classifiers sharing class counts share
//! one null distribution.

use prcband_stats::{descriptive::DescriptiveStats, ecdf::Ecdf};
use rand::Rng;

use crate::{ClassifierCollection, precision::PrecisionConfig, sweep::SweepTable};

/// Default number of random score vectors per null distribution.
pub const DEFAULT_CYCLES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct NullConfig {
    /// Random score vectors drawn per distinct class count.
    pub cycles: usize,
    pub precision: PrecisionConfig,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
            precision: PrecisionConfig::default(),
        }
    }
}

/// One classifier's AUPRC tested against random scoring.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NullTest {
    pub name: String,
    pub positives: u64,
    pub negatives: u64,
    pub auprc: f64,
    /// Fraction of null draws with AUPRC at or above `auprc`.
    pub p_value: f64,
    /// Summary of the null distribution, `None` when it is empty.
    pub null: Option<DescriptiveStats>,
}

/// AUPRC of `cycles` random scorings of `positives` followed by `negatives`.
pub fn null_distribution<R>(
    rng: &mut R,
    positives: u64,
    negatives: u64,
    cycles: usize,
    config: &PrecisionConfig,
) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let labels = (0..positives + negatives)
        .map(|k| k < positives)
        .collect::<Vec<_>>();
    (0..cycles)
        .map(|_| {
            let scored = labels
                .iter()
                .map(|&label| (rng.random::<f64>(), label))
                .collect();
            SweepTable::from_scored(scored).auprc(config)
        })
        .collect()
}

/// Tests every classifier in `collection` against its null distribution.
///
/// Null distributions are drawn in order of first appearance of each class
/// count, so a seeded `rng` reproduces the result.
///
/// # Examples
///
/// ```
/// use prcband_engine::{
///     ClassifierCollection, Orientation, ScoreColumn,
///     null::{NullConfig, random_pvalues},
/// };
///
/// let truth = vec![true, true, true, false, false, false];
/// let scores = [0.9, 0.8, 0.7, 0.3, 0.2, 0.1].map(Some).to_vec();
/// let collection =
///     ClassifierCollection::new(truth, vec![ScoreColumn::new("m", Orientation::High, scores)])
///         .unwrap();
///
/// let config = NullConfig { cycles: 500, ..NullConfig::default() };
/// let tests = random_pvalues(&mut rand::rng(), &collection, &config);
/// assert!(tests[0].p_value < 0.2);
/// ```
pub fn random_pvalues<R>(
    rng: &mut R,
    collection: &ClassifierCollection,
    config: &NullConfig,
) -> Vec<NullTest>
where
    R: Rng + ?Sized,
{
    let mut nulls: Vec<((u64, u64), Vec<f64>)> = vec![];
    for classifier in collection {
        let key = (
            classifier.table().positives(),
            classifier.table().negatives(),
        );
        if nulls.iter().any(|(k, _)| *k == key) {
            continue;
        }
        log::info!(
            "drawing {} random scorings for {} positives and {} negatives",
            config.cycles,
            key.0,
            key.1
        );
        let null = null_distribution(rng, key.0, key.1, config.cycles, &config.precision);
        nulls.push((key, null));
    }

    collection
        .iter()
        .map(|classifier| {
            let table = classifier.table();
            let key = (table.positives(), table.negatives());
            let null = nulls
                .iter()
                .find_map(|(k, null)| (*k == key).then_some(null.as_slice()))
                .unwrap_or_default();
            let auprc = table.auprc(&config.precision);
            NullTest {
                name: classifier.name().to_owned(),
                positives: key.0,
                negatives: key.1,
                auprc,
                p_value: 1.0 - Ecdf::new(null.iter().copied()).fraction_below(auprc),
                null: DescriptiveStats::new(null.iter().copied()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{ScoreColumn, sweep::Orientation};

    fn collection() -> ClassifierCollection {
        let truth = (0..10).map(|k| k < 5).collect::<Vec<_>>();
        let perfect = (0..10).map(|k| Some(f64::from(10 - k))).collect();
        let inverted = (0..10).map(|k| Some(f64::from(k))).collect();
        let mut partial = (0..10).map(|k| Some(f64::from(k))).collect::<Vec<_>>();
        partial[9] = None;
        ClassifierCollection::new(
            truth,
            vec![
                ScoreColumn::new("perfect", Orientation::High, perfect),
                ScoreColumn::new("inverted", Orientation::High, inverted),
                ScoreColumn::new("partial", Orientation::High, partial),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_pvalues_order_classifiers() {
        let config = NullConfig {
            cycles: 2000,
            ..NullConfig::default()
        };
        let tests = random_pvalues(&mut Pcg32::seed_from_u64(10), &collection(), &config);
        assert_eq!(tests.len(), 3);
        assert!(tests[0].p_value < 0.02, "{}", tests[0].p_value);
        assert!(tests[1].p_value > 0.9, "{}", tests[1].p_value);
        assert_eq!((tests[2].positives, tests[2].negatives), (5, 4));
        let null = tests[0].null.as_ref().unwrap();
        assert_eq!(null.count, 2000);
        assert!(null.min >= 0.0 && null.max <= 1.0 + 1e-12);
    }

    #[test]
    fn test_null_distribution_is_reproducible() {
        let config = PrecisionConfig::default();
        let a = null_distribution(&mut Pcg32::seed_from_u64(5), 4, 6, 50, &config);
        let b = null_distribution(&mut Pcg32::seed_from_u64(5), 4, 6, 50, &config);
        assert_eq!(a.len(), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_cycles() {
        let config = NullConfig {
            cycles: 0,
            ..NullConfig::default()
        };
        let tests = random_pvalues(&mut Pcg32::seed_from_u64(0), &collection(), &config);
        assert!(tests.iter().all(|t| t.p_value.is_nan() && t.null.is_none()));
    }
}

//! Pairwise significance of AUPRC differences between classifiers.
//!
//! Each classifier gets an **AUPRC ladder**: for every probability `p` in
//! `res, 2 res, ..., 1 - res`, the exact confidence-interval quantile of
//! precision at level `p` is taken at every sweep row, and the resulting
//! curve is integrated against recall. The ladder's empirical CDF stands in
//! for the distribution of the classifier's AUPRC.
//!
//! For an ordered pair `(i, j)`:
//!
//! - the p-value is `1 - F_j(auprc_i)`, the share of `j`'s ladder at or above
//!   `i`'s observed AUPRC
//! - the log-likelihood ratio is
//!   `log10(∫ F_j (1 - F_i) dx / ∫ F_i (1 - F_j) dx)`, positive when `i`'s
//!   distribution lies above `j`'s
//!
//! Ladders involve no randomness and are built concurrently, one thread per
//! classifier.

use std::thread;

use prcband_stats::{ecdf::Ecdf, integrate::trapezoid};

use crate::{
    ClassifierCollection,
    interval::{self, CiError},
    precision::{self, PrecisionConfig},
    sweep::SweepTable,
};

/// Probability at which the lower end of the reported interval is read.
pub const CI_LOWER_PROBABILITY: f64 = 0.025;
/// Probability at which the upper end of the reported interval is read.
pub const CI_UPPER_PROBABILITY: f64 = 0.975;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SignificanceConfig {
    /// Step of both the rate grid and the probability ladder.
    pub resolution: f64,
    pub precision: PrecisionConfig,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            resolution: interval::DEFAULT_RESOLUTION,
            precision: PrecisionConfig::default(),
        }
    }
}

/// AUPRC of quantile curves over a ladder of probabilities.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuprcLadder {
    probabilities: Vec<f64>,
    values: Vec<f64>,
}

impl AuprcLadder {
    /// Builds the ladder for one sweep table.
    ///
    /// # Errors
    ///
    /// Fails with [`CiError::InvalidResolution`] unless the resolution lies in
    /// `[MIN_RESOLUTION, 1]`.
    ///
    /// [`MIN_RESOLUTION`]: interval::MIN_RESOLUTION
    #[expect(clippy::cast_precision_loss)]
    pub fn build(table: &SweepTable, config: &SignificanceConfig) -> Result<Self, CiError> {
        let resolution = config.resolution;
        interval::check_resolution(resolution)?;
        let probabilities = (1..interval::grid_steps(resolution))
            .map(|k| k as f64 * resolution)
            .collect::<Vec<_>>();

        let rows = table.rows();
        let counts = rows[..rows.len() - 1]
            .iter()
            .map(|row| row.precision_counts())
            .collect::<Vec<_>>();
        let ci = interval::exact_ci(&counts, &probabilities, resolution)?;
        let recall = table.recall();

        let values = (0..probabilities.len())
            .map(|column| {
                let mut curve = ci
                    .rows()
                    .iter()
                    .map(|row| row.quantiles[column])
                    .collect::<Vec<_>>();
                curve.push(curve[curve.len() - 1]);
                let curve = precision::configure(&curve, table.prior(), &config.precision);
                trapezoid(&recall, &curve)
            })
            .collect();

        Ok(Self {
            probabilities,
            values,
        })
    }

    /// Ladder probabilities in ascending order.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// AUPRC at each ladder probability.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// AUPRC at the ladder probability closest to `probability`.
    #[must_use]
    pub fn value_at(&self, probability: f64) -> Option<f64> {
        let idx = self
            .probabilities
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - probability)
                    .abs()
                    .total_cmp(&(*b - probability).abs())
            })?
            .0;
        Some(self.values[idx])
    }

    #[must_use]
    pub fn ecdf(&self) -> Ecdf {
        Ecdf::new(self.values.iter().copied())
    }
}

/// Square matrix indexed by classifier position, NaN on the diagonal.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct PairwiseMatrix(Vec<Vec<f64>>);

impl PairwiseMatrix {
    fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self(
            (0..size)
                .map(|i| {
                    (0..size)
                        .map(|j| if i == j { f64::NAN } else { f(i, j) })
                        .collect()
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.0[i][j]
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.0
    }
}

/// Observed AUPRC and its ladder interval for one classifier.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClassifierSignificance {
    pub name: String,
    pub auprc: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SignificanceReport {
    pub classifiers: Vec<ClassifierSignificance>,
    /// `p_values[i][j]`: share of `j`'s ladder at or above `i`'s AUPRC.
    pub p_values: PairwiseMatrix,
    /// `llr[i][j]`: log10 likelihood ratio that `i` lies above `j`.
    pub llr: PairwiseMatrix,
}

/// Compares every ordered pair of classifiers by AUPRC.
///
/// # Errors
///
/// Fails with [`CiError::InvalidResolution`] unless `config.resolution` lies
/// in `[MIN_RESOLUTION, 1]`.
///
/// [`MIN_RESOLUTION`]: interval::MIN_RESOLUTION
///
/// # Examples
///
/// ```
/// use prcband_engine::{
///     ClassifierCollection, Orientation, ScoreColumn,
///     significance::{SignificanceConfig, auprc_significance},
/// };
///
/// let truth = vec![true, true, true, false, false, false];
/// let collection = ClassifierCollection::new(
///     truth,
///     vec![
///         ScoreColumn::new("a", Orientation::High, [6.0, 5.0, 4.0, 3.0, 2.0, 1.0].map(Some).to_vec()),
///         ScoreColumn::new("b", Orientation::High, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0].map(Some).to_vec()),
///     ],
/// )
/// .unwrap();
///
/// let config = SignificanceConfig { resolution: 0.01, ..SignificanceConfig::default() };
/// let report = auprc_significance(&collection, &config).unwrap();
///
/// assert!(report.llr.get(0, 1) > 0.0);
/// assert!(report.p_values.get(0, 0).is_nan());
/// ```
pub fn auprc_significance(
    collection: &ClassifierCollection,
    config: &SignificanceConfig,
) -> Result<SignificanceReport, CiError> {
    let mut slots = (0..collection.len()).map(|_| None).collect::<Vec<_>>();
    thread::scope(|s| {
        for (classifier, slot) in collection.iter().zip(&mut slots) {
            s.spawn(move || {
                *slot = Some(AuprcLadder::build(classifier.table(), config));
            });
        }
    });
    let ladders = slots.into_iter().flatten().collect::<Result<Vec<_>, _>>()?;
    log::info!(
        "built {} AUPRC ladders of {} steps",
        ladders.len(),
        ladders.first().map_or(0, |l| l.values().len())
    );

    let observed = collection.auprc(&config.precision);
    let ecdfs = ladders.iter().map(AuprcLadder::ecdf).collect::<Vec<_>>();

    let classifiers = collection
        .iter()
        .zip(&observed)
        .zip(&ladders)
        .map(|((classifier, &auprc), ladder)| ClassifierSignificance {
            name: classifier.name().to_owned(),
            auprc,
            ci_lower: ladder.value_at(CI_LOWER_PROBABILITY).unwrap_or(f64::NAN),
            ci_upper: ladder.value_at(CI_UPPER_PROBABILITY).unwrap_or(f64::NAN),
        })
        .collect();
    let p_values = PairwiseMatrix::from_fn(ecdfs.len(), |i, j| {
        1.0 - ecdfs[j].fraction_below(observed[i])
    });
    let llr = PairwiseMatrix::from_fn(ecdfs.len(), |i, j| {
        log_likelihood_ratio(&ecdfs[i], &ecdfs[j])
    });

    Ok(SignificanceReport {
        classifiers,
        p_values,
        llr,
    })
}

/// `log10(∫ F_b (1 - F_a) / ∫ F_a (1 - F_b))` over the union of both samples.
#[must_use]
pub fn log_likelihood_ratio(a: &Ecdf, b: &Ecdf) -> f64 {
    let mut xs = a
        .sorted_values()
        .iter()
        .chain(b.sorted_values())
        .copied()
        .collect::<Vec<_>>();
    xs.sort_by(f64::total_cmp);
    xs.dedup();

    let (a_cdf, b_cdf): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .map(|&x| (a.fraction_below(x), b.fraction_below(x)))
        .unzip();
    let above = a_cdf
        .iter()
        .zip(&b_cdf)
        .map(|(fa, fb)| fb * (1.0 - fa))
        .collect::<Vec<_>>();
    let below = a_cdf
        .iter()
        .zip(&b_cdf)
        .map(|(fa, fb)| fa * (1.0 - fb))
        .collect::<Vec<_>>();
    (trapezoid(&xs, &above) / trapezoid(&xs, &below)).log10()
}

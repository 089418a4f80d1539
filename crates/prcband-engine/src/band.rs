//! Confidence bands on precision along the recall axis.
//!
//! All `(recall, precision)` points of a path ensemble are pooled and sorted
//! into equal-width recall bins. The band at each bin is a pair of precision
//! percentiles of the points that landed there.

use prcband_stats::{binning::EqualWidthBins, percentiles::compute_percentile};

use crate::path::PathEnsemble;

pub const DEFAULT_BINS: usize = 50;
pub const DEFAULT_LOWER_PERCENTILE: f64 = 2.5;
pub const DEFAULT_UPPER_PERCENTILE: f64 = 97.5;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BandConfig {
    /// Number of equal-width recall bins over `[0, 1]`.
    pub bins: usize,
    /// Percentile (0-100) of precision used as the lower bound.
    pub lower_percentile: f64,
    /// Percentile (0-100) of precision used as the upper bound.
    pub upper_percentile: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            lower_percentile: DEFAULT_LOWER_PERCENTILE,
            upper_percentile: DEFAULT_UPPER_PERCENTILE,
        }
    }
}

/// Precision bounds for one recall bin.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BandRow {
    /// Center of the recall bin.
    pub recall: f64,
    /// Lower precision bound, NaN for an empty bin.
    pub lower: f64,
    /// Upper precision bound, NaN for an empty bin.
    pub upper: f64,
    /// Number of pooled points in the bin.
    pub points: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConfidenceBand {
    rows: Vec<BandRow>,
}

impl ConfidenceBand {
    /// One row per bin, in ascending recall order.
    #[must_use]
    pub fn rows(&self) -> &[BandRow] {
        &self.rows
    }
}

/// Bins the ensemble's points along recall and takes precision percentiles
/// per bin.
///
/// Points with a NaN coordinate are skipped.
///
/// # Panics
///
/// Panics if `config.bins` is zero.
///
/// # Examples
///
/// ```
/// use prcband_engine::{
///     Orientation, SweepTable,
///     band::{BandConfig, infer_band},
///     path::{PathSamplerConfig, sample_paths},
/// };
///
/// let truth = [true, true, false, true, false, false];
/// let scores = [0.9, 0.8, 0.7, 0.6, 0.4, 0.2].map(Some);
/// let table = SweepTable::build(&truth, &scores, Orientation::High).unwrap();
/// let ensemble = sample_paths(&mut rand::rng(), &table, &PathSamplerConfig::default()).unwrap();
///
/// let band = infer_band(&ensemble, &BandConfig::default());
/// assert_eq!(band.rows().len(), 50);
/// for row in band.rows().iter().filter(|r| r.points > 0) {
///     assert!(row.lower <= row.upper);
/// }
/// ```
#[must_use]
pub fn infer_band(ensemble: &PathEnsemble, config: &BandConfig) -> ConfidenceBand {
    let bins = EqualWidthBins::new(0.0, 1.0, config.bins);

    let mut binned = vec![vec![]; bins.count()];
    for (recall, precision) in ensemble.points() {
        if precision.is_nan() {
            continue;
        }
        if let Some(idx) = bins.index_of(recall) {
            binned[idx].push(precision);
        }
    }

    let rows = binned
        .into_iter()
        .enumerate()
        .map(|(idx, mut values)| {
            values.sort_by(f64::total_cmp);
            BandRow {
                recall: bins.center(idx),
                lower: compute_percentile(&values, config.lower_percentile),
                upper: compute_percentile(&values, config.upper_percentile),
                points: values.len(),
            }
        })
        .collect();
    ConfidenceBand { rows }
}

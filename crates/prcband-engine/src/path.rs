//! Random precision/recall paths drawn along a sweep table.
//!
//! A path holds one sampled precision and one sampled recall per sweep row,
//! excluding the `+inf` sentinel. Precision at a row is drawn from the counts
//! `(tp, tp + fp)` and recall from `(tp, tp + fn)`.
//!
//! With monotonized sampling each path is additionally constrained to look
//! like a real precision-recall curve: as the threshold rises, a path's
//! precision may not fall below its previous value and its recall may not
//! rise above its previous value. The constraint is applied while sampling,
//! so every row's draw is conditioned on the same path's previous row.

use rand::Rng;

use crate::{
    rate::RateWindow,
    sampler::{SamplingError, SamplingPolicy},
    sweep::SweepTable,
};

/// Default number of paths per ensemble.
pub const DEFAULT_SAMPLES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PathSamplerConfig {
    /// Number of paths to draw.
    pub samples: usize,
    /// Constrain each path to non-decreasing precision and non-increasing
    /// recall.
    pub monotonized: bool,
    pub policy: SamplingPolicy,
}

impl Default for PathSamplerConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            monotonized: true,
            policy: SamplingPolicy::Quick,
        }
    }
}

/// One random draw of a whole precision/recall curve.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SampledPath {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
}

impl SampledPath {
    /// `(recall, precision)` points in row order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.recall.iter().copied().zip(self.precision.iter().copied())
    }
}

/// Independent random paths for one classifier.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PathEnsemble {
    paths: Vec<SampledPath>,
}

impl PathEnsemble {
    #[must_use]
    pub fn from_paths(paths: Vec<SampledPath>) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &[SampledPath] {
        &self.paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Every `(recall, precision)` point of every path.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.paths.iter().flat_map(SampledPath::points)
    }
}

/// Draws `config.samples` random paths along `table`.
///
/// Rows are processed one at a time; within a row every path is sampled in
/// one call to the configured sampler.
///
/// # Errors
///
/// Propagates [`SamplingError`] from the rate sampler.
///
/// # Examples
///
/// ```
/// use prcband_engine::{
///     Orientation, SweepTable,
///     path::{PathSamplerConfig, sample_paths},
/// };
///
/// let truth = [true, false, true, true, false];
/// let scores = [Some(0.9), Some(0.7), Some(0.6), Some(0.3), Some(0.2)];
/// let table = SweepTable::build(&truth, &scores, Orientation::High).unwrap();
///
/// let config = PathSamplerConfig {
///     samples: 20,
///     ..PathSamplerConfig::default()
/// };
/// let ensemble = sample_paths(&mut rand::rng(), &table, &config).unwrap();
///
/// assert_eq!(ensemble.len(), 20);
/// for path in ensemble.paths() {
///     assert_eq!(path.precision.len(), table.rows().len() - 1);
///     assert!(path.precision.is_sorted_by(|a, b| a <= b));
///     assert!(path.recall.is_sorted_by(|a, b| a >= b));
/// }
/// ```
pub fn sample_paths<R>(
    rng: &mut R,
    table: &SweepTable,
    config: &PathSamplerConfig,
) -> Result<PathEnsemble, SamplingError>
where
    R: Rng + ?Sized,
{
    let rows = &table.rows()[..table.rows().len() - 1];
    let n = config.samples;

    // Row-major: precision[row][path]
    let mut precision: Vec<Vec<f64>> = Vec::with_capacity(rows.len());
    let mut recall: Vec<Vec<f64>> = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let (precision_windows, recall_windows) = match (precision.last(), recall.last()) {
            (Some(prev_precision), Some(prev_recall)) if config.monotonized => (
                prev_precision
                    .iter()
                    .map(|&p| RateWindow::at_least(p))
                    .collect::<Vec<_>>(),
                prev_recall
                    .iter()
                    .map(|&r| RateWindow::at_most(r))
                    .collect::<Vec<_>>(),
            ),
            _ => (vec![RateWindow::FULL; n], vec![RateWindow::FULL; n]),
        };

        precision.push(
            config
                .policy
                .sample(rng, row.precision_counts(), &precision_windows)?,
        );
        recall.push(
            config
                .policy
                .sample(rng, row.recall_counts(), &recall_windows)?,
        );
        log::debug!(
            "sampled row {}/{} (threshold {})",
            idx + 1,
            rows.len(),
            row.threshold
        );
    }

    let paths = (0..n)
        .map(|path| SampledPath {
            precision: precision.iter().map(|row| row[path]).collect(),
            recall: recall.iter().map(|row| row[path]).collect(),
        })
        .collect();
    Ok(PathEnsemble { paths })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::sweep::Orientation;

    fn table() -> SweepTable {
        let truth = [
            true, false, true, true, false, true, false, false, true, false,
        ];
        let scores = [0.95, 0.9, 0.85, 0.7, 0.6, 0.55, 0.4, 0.3, 0.2, 0.1].map(Some);
        SweepTable::build(&truth, &scores, Orientation::High).unwrap()
    }

    #[test]
    fn test_shape() {
        let table = table();
        for policy in [SamplingPolicy::Accurate, SamplingPolicy::Quick] {
            let config = PathSamplerConfig {
                samples: 30,
                monotonized: false,
                policy,
            };
            let ensemble = sample_paths(&mut Pcg32::seed_from_u64(1), &table, &config).unwrap();
            assert_eq!(ensemble.len(), 30);
            for path in ensemble.paths() {
                assert_eq!(path.precision.len(), table.rows().len() - 1);
                assert_eq!(path.recall.len(), table.rows().len() - 1);
                assert!(path.points().all(|(r, p)| {
                    (0.0..=1.0).contains(&r) && (0.0..=1.0).contains(&p)
                }));
            }
        }
    }

    #[test]
    fn test_monotonized_paths_are_monotone() {
        let table = table();
        for policy in [SamplingPolicy::Accurate, SamplingPolicy::Quick] {
            let config = PathSamplerConfig {
                samples: 100,
                monotonized: true,
                policy,
            };
            let ensemble = sample_paths(&mut Pcg32::seed_from_u64(2), &table, &config).unwrap();
            for path in ensemble.paths() {
                assert!(path.precision.is_sorted_by(|a, b| a <= b));
                assert!(path.recall.is_sorted_by(|a, b| a >= b));
            }
        }
    }

    #[test]
    fn test_same_seed_same_paths() {
        let table = table();
        let config = PathSamplerConfig {
            samples: 10,
            ..PathSamplerConfig::default()
        };
        let a = sample_paths(&mut Pcg32::seed_from_u64(3), &table, &config).unwrap();
        let b = sample_paths(&mut Pcg32::seed_from_u64(3), &table, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_samples() {
        let config = PathSamplerConfig {
            samples: 0,
            ..PathSamplerConfig::default()
        };
        let ensemble = sample_paths(&mut Pcg32::seed_from_u64(4), &table(), &config).unwrap();
        assert!(ensemble.is_empty());
        assert_eq!(ensemble.points().count(), 0);
    }
}

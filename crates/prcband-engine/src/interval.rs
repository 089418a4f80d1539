//! Grid-based exact confidence intervals on success rates.
//!
//! For counts `(i, n)` the binomial likelihood of `i` is evaluated on an evenly
//! spaced grid of rates in `[0, 1]`, normalized into a discrete CDF, and read
//! back as a quantile function: the quantile at probability `p` is the largest
//! grid rate whose CDF is still below `p`. Under a uniform prior this is the
//! posterior quantile of the rate, accurate to the grid resolution.
//!
//! When no grid rate has a CDF below `p` (always the case for `p = 0`), the
//! quantile is `0`.
//!
//! # Examples
//!
//! ```
//! use prcband_engine::{interval::exact_ci, rate::RateCounts};
//!
//! let counts = [RateCounts::new(8, 10), RateCounts::new(1, 4)];
//! let table = exact_ci(&counts, &[0.025, 0.975], 0.001).unwrap();
//!
//! for row in table.rows() {
//!     let &[lower, upper] = row.quantiles.as_slice() else { unreachable!() };
//!     assert!(lower < row.counts.mle() && row.counts.mle() < upper);
//! }
//! ```

use crate::rate::RateCounts;

/// Default grid step for [`exact_ci`].
pub const DEFAULT_RESOLUTION: f64 = 0.001;

/// Finest accepted grid step. Grids and ladders hold one value per step.
pub const MIN_RESOLUTION: f64 = 1e-7;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CiError {
    #[display("grid resolution must lie in [{}, 1], got {resolution}", MIN_RESOLUTION)]
    InvalidResolution { resolution: f64 },
    #[display("invalid counts: {successes} successes out of {trials} trials")]
    InvalidCounts { successes: u64, trials: u64 },
}

/// An evenly spaced grid of rates `0, res, 2 res, ..., <= 1`.
#[derive(Debug, Clone)]
pub struct RateGrid {
    rates: Vec<f64>,
}

impl RateGrid {
    /// Creates a grid with step `resolution`.
    #[expect(clippy::cast_precision_loss)]
    pub fn new(resolution: f64) -> Result<Self, CiError> {
        check_resolution(resolution)?;
        let steps = grid_steps(resolution);
        let rates = (0..=steps)
            .map(|k| (k as f64 * resolution).min(1.0))
            .collect();
        Ok(Self { rates })
    }

    /// Grid rates in ascending order.
    #[must_use]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Discrete CDF of the normalized binomial likelihood over the grid.
    #[must_use]
    pub fn cdf(&self, counts: RateCounts) -> Vec<f64> {
        let ln_density = self
            .rates
            .iter()
            .map(|&rate| counts.ln_likelihood(rate))
            .collect::<Vec<_>>();
        let peak = ln_density
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let mut cumulative = Vec::with_capacity(ln_density.len());
        let mut total = 0.0;
        for ln_d in ln_density {
            total += (ln_d - peak).exp();
            cumulative.push(total);
        }
        for c in &mut cumulative {
            *c /= total;
        }
        cumulative
    }

    /// Quantiles of the rate for `counts` at each of `probabilities`.
    ///
    /// Each quantile is the largest grid rate whose CDF is below the
    /// probability, or `0` if there is none.
    pub fn quantiles(
        &self,
        counts: RateCounts,
        probabilities: &[f64],
    ) -> Result<Vec<f64>, CiError> {
        if !counts.is_valid() {
            return Err(CiError::InvalidCounts {
                successes: counts.successes,
                trials: counts.trials,
            });
        }
        let cdf = self.cdf(counts);
        let quantiles = probabilities
            .iter()
            .map(|&p| {
                let below = cdf.partition_point(|&c| c < p);
                if below == 0 { 0.0 } else { self.rates[below - 1] }
            })
            .collect();
        Ok(quantiles)
    }
}

pub(crate) fn check_resolution(resolution: f64) -> Result<(), CiError> {
    if (MIN_RESOLUTION..=1.0).contains(&resolution) {
        Ok(())
    } else {
        Err(CiError::InvalidResolution { resolution })
    }
}

/// Number of whole steps of size `resolution` that fit in `[0, 1]`.
#[expect(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub(crate) fn grid_steps(resolution: f64) -> usize {
    let exact = 1.0 / resolution;
    let rounded = exact.round();
    if (exact - rounded).abs() < 1e-9 {
        rounded as usize
    } else {
        exact.floor() as usize
    }
}

/// Confidence bounds for one `(i, n)` pair.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CiRow {
    pub counts: RateCounts,
    /// One quantile per requested probability, in request order.
    pub quantiles: Vec<f64>,
}

/// Exact confidence intervals for a list of count pairs.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CiTable {
    probabilities: Vec<f64>,
    rows: Vec<CiRow>,
}

impl CiTable {
    /// The probabilities heading each quantile column.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// One row per input pair, in input order.
    #[must_use]
    pub fn rows(&self) -> &[CiRow] {
        &self.rows
    }

    /// Quantile column for `probability`, if it was requested.
    #[must_use]
    pub fn column(&self, probability: f64) -> Option<Vec<f64>> {
        let idx = self
            .probabilities
            .iter()
            .position(|p| (p - probability).abs() < 1e-12)?;
        Some(self.rows.iter().map(|row| row.quantiles[idx]).collect())
    }
}

/// Computes grid-based confidence intervals for each `(i, n)` pair.
///
/// # Arguments
///
/// * `counts` - Success/trial pairs, one interval per pair
/// * `probabilities` - Quantile probabilities, e.g. `[0.025, 0.975]`
/// * `resolution` - Grid step in `[MIN_RESOLUTION, 1]`, see [`DEFAULT_RESOLUTION`]
///
/// # Errors
///
/// Fails if the resolution is out of range or any pair has more successes
/// than trials.
pub fn exact_ci(
    counts: &[RateCounts],
    probabilities: &[f64],
    resolution: f64,
) -> Result<CiTable, CiError> {
    let grid = RateGrid::new(resolution)?;
    let rows = counts
        .iter()
        .map(|&counts| {
            Ok(CiRow {
                counts,
                quantiles: grid.quantiles(counts, probabilities)?,
            })
        })
        .collect::<Result<Vec<_>, CiError>>()?;
    Ok(CiTable {
        probabilities: probabilities.to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_covers_unit_interval() {
        let grid = RateGrid::new(0.001).unwrap();
        assert_eq!(grid.rates().len(), 1001);
        assert_eq!(grid.rates()[0], 0.0);
        assert_eq!(*grid.rates().last().unwrap(), 1.0);

        let coarse = RateGrid::new(0.3).unwrap();
        assert_eq!(coarse.rates().len(), 4);
    }

    #[test]
    fn test_invalid_resolution() {
        assert!(matches!(
            RateGrid::new(0.0),
            Err(CiError::InvalidResolution { .. })
        ));
        assert!(RateGrid::new(1.5).is_err());
        assert!(RateGrid::new(f64::NAN).is_err());
        assert!(RateGrid::new(-0.1).is_err());
    }

    #[test]
    fn test_tiny_resolution_is_rejected() {
        assert_eq!(
            RateGrid::new(1e-12).unwrap_err(),
            CiError::InvalidResolution { resolution: 1e-12 }
        );
        assert!(exact_ci(&[RateCounts::new(1, 2)], &[0.5], MIN_RESOLUTION / 2.0).is_err());
        assert!(check_resolution(MIN_RESOLUTION).is_ok());
        assert!(check_resolution(1.0).is_ok());
    }

    #[test]
    fn test_invalid_counts() {
        let err = exact_ci(&[RateCounts::new(5, 3)], &[0.5], 0.01).unwrap_err();
        assert_eq!(
            err,
            CiError::InvalidCounts {
                successes: 5,
                trials: 3
            }
        );
    }

    #[test]
    fn test_cdf_is_monotone_and_ends_at_one() {
        let grid = RateGrid::new(0.01).unwrap();
        let cdf = grid.cdf(RateCounts::new(3, 9));
        assert!(cdf.is_sorted_by(|a, b| a <= b));
        assert!((cdf.last().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_probability_range_brackets_mle() {
        let grid = RateGrid::new(0.001).unwrap();
        for n in 2..30 {
            for i in 1..n {
                let counts = RateCounts::new(i, n);
                let q = grid.quantiles(counts, &[0.0, 1.0]).unwrap();
                assert_eq!(q[0], 0.0);
                assert!(q[0] <= counts.mle() && counts.mle() <= q[1], "{i}/{n}: {q:?}");
            }
        }
    }

    #[test]
    fn test_quantiles_increase_with_probability() {
        let grid = RateGrid::new(0.001).unwrap();
        let q = grid
            .quantiles(RateCounts::new(12, 40), &[0.025, 0.25, 0.5, 0.75, 0.975])
            .unwrap();
        assert!(q.is_sorted_by(|a, b| a <= b));
        assert!(q[0] < 0.3 && 0.3 < q[4]);
    }

    #[test]
    fn test_zero_trials_is_uniform() {
        let grid = RateGrid::new(0.001).unwrap();
        let q = grid.quantiles(RateCounts::new(0, 0), &[0.25, 0.5]).unwrap();
        assert!((q[0] - 0.25).abs() < 0.005);
        assert!((q[1] - 0.5).abs() < 0.005);
    }

    #[test]
    fn test_extreme_counts() {
        let grid = RateGrid::new(0.001).unwrap();
        let none = grid.quantiles(RateCounts::new(0, 50), &[0.975]).unwrap();
        assert!(none[0] < 0.1);
        let all = grid.quantiles(RateCounts::new(50, 50), &[0.025]).unwrap();
        assert!(all[0] > 0.9);
    }

    #[test]
    fn test_table_columns() {
        let counts = [RateCounts::new(1, 2), RateCounts::new(9, 10)];
        let table = exact_ci(&counts, &[0.025, 0.975], 0.01).unwrap();
        assert_eq!(table.rows().len(), 2);
        let lower = table.column(0.025).unwrap();
        let upper = table.column(0.975).unwrap();
        assert!(lower.iter().zip(&upper).all(|(l, u)| l < u));
        assert!(table.column(0.5).is_none());
    }
}

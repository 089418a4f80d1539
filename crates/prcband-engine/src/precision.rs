//! Post-processing of precision sequences.
//!
//! Precision read off a sweep table (or sampled from it) is noisy: it may dip
//! as the threshold rises even though the underlying curve should not. Two
//! transforms are provided:
//!
//! - [`monotonize`]: forward running maximum
//! - [`balance`]: rescale precision to the value it would take at a 50% prior
//!
//! [`configure`] composes them, balancing first.

/// Which transforms to apply to a precision sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PrecisionConfig {
    /// Replace each value with the running maximum.
    pub monotonized: bool,
    /// Rescale from the empirical prior to a prior of 0.5.
    pub balanced: bool,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            monotonized: true,
            balanced: false,
        }
    }
}

/// Replaces each value with the maximum of itself and everything before it.
///
/// NaN entries stay NaN and are skipped when tracking the maximum.
///
/// # Examples
///
/// ```
/// use prcband_engine::precision::monotonize;
///
/// assert_eq!(monotonize(&[0.5, 0.4, 0.7, 0.6]), [0.5, 0.5, 0.7, 0.7]);
/// ```
#[must_use]
pub fn monotonize(values: &[f64]) -> Vec<f64> {
    let mut running = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                return v;
            }
            running = running.max(v);
            running
        })
        .collect()
}

/// Rescales precision `p` observed at class prior `prior` to a prior of 0.5.
///
/// `p = 0` and `p = 1` map to themselves for any prior in `(0, 1)`, and the
/// transform is the identity at `prior = 0.5`. When the denominator vanishes
/// `p` is returned unchanged.
///
/// # Examples
///
/// ```
/// use prcband_engine::precision::balance;
///
/// assert_eq!(balance(0.3, 0.5), 0.3);
/// assert_eq!(balance(1.0, 0.1), 1.0);
/// // A precision equal to a 10% prior is no better than chance
/// assert!((balance(0.1, 0.1) - 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn balance(p: f64, prior: f64) -> f64 {
    let hit = p * (1.0 - prior);
    let denominator = hit + (1.0 - p) * prior;
    if denominator == 0.0 {
        return p;
    }
    hit / denominator
}

/// Applies balancing (against `prior`) and then monotonization as requested.
#[must_use]
pub fn configure(precision: &[f64], prior: f64, config: &PrecisionConfig) -> Vec<f64> {
    let balanced = if config.balanced {
        precision.iter().map(|&p| balance(p, prior)).collect()
    } else {
        precision.to_vec()
    };
    if config.monotonized {
        monotonize(&balanced)
    } else {
        balanced
    }
}

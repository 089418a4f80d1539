//! Percentiles of a sorted sample.

/// Computes a single percentile value from sorted data.
///
/// The percentile is linearly interpolated between the two order statistics
/// that bracket it: for `n` values the `k`-th percentile sits at fractional
/// position `h = (n - 1) * k / 100`, and the result is
/// `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `percentile` - The percentile to compute (0.0 to 100.0, clamped)
///
/// # Returns
///
/// The value at the specified percentile. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use prcband_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
///
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert_eq!(compute_percentile(&values, 25.0), 2.0);
/// assert_eq!(compute_percentile(&values, 12.5), 1.5);
/// assert!(compute_percentile(&[], 50.0).is_nan());
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let position = (sorted_values.len() - 1) as f64 * percentile.clamp(0.0, 100.0) / 100.0;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted_values.len() - 1);
    let fraction = position - position.floor();
    let (lo, hi) = (sorted_values[lower], sorted_values[upper]);
    if fraction == 0.0 {
        lo
    } else {
        lo + fraction * (hi - lo)
    }
}

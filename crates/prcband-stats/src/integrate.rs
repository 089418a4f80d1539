//! Trapezoid-rule integration over ordered points.
//!
//! Areas under ROC and precision-recall curves, and integrals of empirical
//! CDFs, are all accumulated with the same rule: consecutive points are joined
//! by straight segments and the area under each segment is summed.
//!
//! Points are integrated **in the order given**. Abscissa differences are
//! taken in absolute value, so a curve traced from right to left has the same
//! area as the same curve traced from left to right.

use std::iter;

/// Integrates `ys` over `xs` with the trapezoid rule, in point order.
///
/// Each consecutive pair contributes `|x[i+1] - x[i]| * (y[i] + y[i+1]) / 2`.
/// Pairs where either coordinate is NaN are dropped before integration, so
/// undefined curve points are skipped rather than poisoning the sum.
///
/// # Arguments
///
/// * `xs` - Abscissas, in the order along which area is accumulated
/// * `ys` - Ordinates, aligned with `xs`
///
/// # Returns
///
/// The accumulated area. Returns `0.0` when fewer than two defined points remain.
///
/// # Panics
///
/// Panics if `xs` and `ys` have different lengths.
///
/// # Examples
///
/// ```
/// use prcband_stats::integrate::trapezoid;
///
/// // Constant function over [0, 2]
/// assert_eq!(trapezoid(&[0.0, 1.0, 2.0], &[0.5, 0.5, 0.5]), 1.0);
///
/// // Reversed traversal gives the same magnitude
/// assert_eq!(trapezoid(&[2.0, 1.0, 0.0], &[0.5, 0.5, 0.5]), 1.0);
///
/// // Undefined points are skipped
/// assert_eq!(trapezoid(&[0.0, f64::NAN, 1.0], &[1.0, 1.0, 1.0]), 1.0);
/// ```
#[must_use]
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    assert_eq!(xs.len(), ys.len(), "xs and ys must have the same length");

    let mut points = iter::zip(xs, ys)
        .map(|(&x, &y)| (x, y))
        .filter(|(x, y)| !x.is_nan() && !y.is_nan());
    let Some(mut prev) = points.next() else {
        return 0.0;
    };

    let mut area = 0.0;
    for point in points {
        area += (point.0 - prev.0).abs() * (prev.1 + point.1) / 2.0;
        prev = point;
    }
    area
}

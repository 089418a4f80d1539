//! Empirical cumulative distribution functions.
//!
//! The significance tests compare distributions that are only known through a
//! finite ladder of values. [`Ecdf`] turns such a sample into a step function
//! that can be queried at arbitrary points.

/// Empirical CDF of a finite sample.
///
/// NaN values are discarded on construction.
///
/// # Examples
///
/// ```
/// use prcband_stats::ecdf::Ecdf;
///
/// let ecdf = Ecdf::new([0.3, 0.1, 0.2, 0.4]);
///
/// assert_eq!(ecdf.fraction_below(0.1), 0.0);
/// assert_eq!(ecdf.fraction_below(0.25), 0.5);
/// assert_eq!(ecdf.fraction_below(1.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Ecdf {
    sorted: Vec<f64>,
}

impl Ecdf {
    /// Builds an ECDF from unsorted values.
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    /// Number of values in the sample.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Returns `true` if the sample is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// The sample values in ascending order.
    #[must_use]
    pub fn sorted_values(&self) -> &[f64] {
        &self.sorted
    }

    /// Fraction of values strictly below `x`.
    ///
    /// Returns NaN for an empty sample.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fraction_below(&self, x: f64) -> f64 {
        if self.sorted.is_empty() {
            return f64::NAN;
        }
        let count = self.sorted.partition_point(|v| *v < x);
        count as f64 / self.sorted.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample_is_nan() {
        let ecdf = Ecdf::new(Vec::new());
        assert!(ecdf.is_empty());
        assert!(ecdf.fraction_below(0.5).is_nan());
    }

    #[test]
    fn test_ties() {
        let ecdf = Ecdf::new([0.5, 0.5, 0.5, 1.0]);
        assert_eq!(ecdf.fraction_below(0.5), 0.0);
        assert_eq!(ecdf.fraction_below(0.75), 0.75);
    }

    #[test]
    fn test_nan_values_are_discarded() {
        let ecdf = Ecdf::new([f64::NAN, 0.2, 0.8]);
        assert_eq!(ecdf.len(), 2);
        assert_eq!(ecdf.sorted_values(), &[0.2, 0.8]);
    }

    #[test]
    fn test_monotone_in_query() {
        let ecdf = Ecdf::new((0..20).map(|i| f64::from(i) / 20.0));
        let mut prev = 0.0;
        for i in 0..=40 {
            let value = ecdf.fraction_below(f64::from(i) / 40.0);
            assert!(value >= prev);
            prev = value;
        }
        assert_eq!(prev, 1.0);
    }
}

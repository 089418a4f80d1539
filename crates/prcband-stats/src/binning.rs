//! Equal-width binning over a closed interval
//!
//! Confidence bands are computed by pooling points and partitioning one axis
//! into a fixed number of equal-width bins. This module provides the mapping
//! from values to bin indices and back to bin centers.
//!
//! The interval is closed on both ends: the upper endpoint belongs to the
//! last bin, so a range of `[0, 1]` with 50 bins places `1.0` in bin 49.
//!
//! # Examples
//!
//! ```
//! use prcband_stats::binning::EqualWidthBins;
//!
//! let bins = EqualWidthBins::new(0.0, 1.0, 50);
//!
//! assert_eq!(bins.index_of(0.0), Some(0));
//! assert_eq!(bins.index_of(1.0), Some(49));
//! assert_eq!(bins.index_of(1.5), None);
//! assert!((bins.center(0) - 0.01).abs() < 1e-12);
//! ```

/// A partition of `[start, end]` into `count` bins of equal width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualWidthBins {
    start: f64,
    end: f64,
    count: usize,
}

impl EqualWidthBins {
    /// Creates a binning of `[start, end]` into `count` bins.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero or if `start < end` does not hold.
    #[must_use]
    pub fn new(start: f64, end: f64, count: usize) -> Self {
        assert!(count > 0, "bin count must be positive");
        assert!(start < end, "bin range must be non-empty");
        Self { start, end, count }
    }

    /// Number of bins.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Width of each bin.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.end - self.start) / self.count as f64
    }

    /// Returns the index of the bin containing `value`.
    ///
    /// Returns `None` for NaN and for values outside `[start, end]`.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() || value < self.start || value > self.end {
            return None;
        }
        let normalized_position = (value - self.start) / (self.end - self.start) * self.count as f64;
        let idx = (normalized_position.floor() as usize).min(self.count - 1);
        Some(idx)
    }

    /// Returns the midpoint of bin `idx`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn center(&self, idx: usize) -> f64 {
        self.start + (idx as f64 + 0.5) * self.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bin() {
        let bins = EqualWidthBins::new(0.0, 1.0, 1);
        assert_eq!(bins.index_of(0.0), Some(0));
        assert_eq!(bins.index_of(0.5), Some(0));
        assert_eq!(bins.index_of(1.0), Some(0));
        assert_eq!(bins.center(0), 0.5);
    }

    #[test]
    fn test_boundaries_belong_to_upper_bin() {
        let bins = EqualWidthBins::new(0.0, 1.0, 4);
        assert_eq!(bins.index_of(0.25), Some(1));
        assert_eq!(bins.index_of(0.5), Some(2));
        assert_eq!(bins.index_of(0.75), Some(3));
    }

    #[test]
    fn test_out_of_range_and_nan() {
        let bins = EqualWidthBins::new(0.0, 1.0, 10);
        assert_eq!(bins.index_of(-0.01), None);
        assert_eq!(bins.index_of(1.01), None);
        assert_eq!(bins.index_of(f64::NAN), None);
    }

    #[test]
    fn test_centers_are_ascending_and_inside_range() {
        let bins = EqualWidthBins::new(0.0, 1.0, 50);
        let centers = (0..bins.count())
            .map(|idx| bins.center(idx))
            .collect::<Vec<_>>();
        assert_eq!(centers.len(), 50);
        assert!(centers.is_sorted_by(|a, b| a < b));
        assert!(centers.iter().all(|c| (0.0..=1.0).contains(c)));
        for (idx, center) in centers.iter().enumerate() {
            assert_eq!(bins.index_of(*center), Some(idx));
        }
    }

    #[test]
    #[should_panic(expected = "positive")]
    fn test_zero_bins_panics() {
        let _ = EqualWidthBins::new(0.0, 1.0, 0);
    }
}

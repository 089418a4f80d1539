//! Score intervals that reproduce a given row of a sweep table.
//!
//! Row `k` of a sweep table calls positive every sample scoring at least
//! `t[k]`. Any cutoff in `(t[k-1], t[k]]` produces exactly the same call set,
//! so that half-open interval is what a user needs to pick an operating
//! point. For classifiers where low scores are positive the interval is
//! mapped back to the original scale, which flips it to `[-t[k], -t[k-1])`.

use std::{fmt, ops::Bound};

use crate::sweep::Orientation;

/// Half-open interval of score cutoffs on the original score scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRange {
    pub start: Bound<f64>,
    pub end: Bound<f64>,
}

impl ThresholdRange {
    /// The cutoff interval for row `idx` of a table with `thresholds` (on the
    /// internal scale).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::{Bound, RangeBounds as _};
    ///
    /// use prcband_engine::{Orientation, threshold::ThresholdRange};
    ///
    /// let thresholds = [f64::NEG_INFINITY, 0.2, 0.5, 0.9, f64::INFINITY];
    ///
    /// let high = ThresholdRange::from_row(&thresholds, 2, Orientation::High);
    /// assert_eq!(high.start, Bound::Excluded(0.2));
    /// assert_eq!(high.end, Bound::Included(0.5));
    /// assert!(high.contains(&0.3));
    ///
    /// // The same internal thresholds, read back for a low-is-positive score
    /// let low = ThresholdRange::from_row(&thresholds, 2, Orientation::Low);
    /// assert_eq!(low.start, Bound::Included(-0.5));
    /// assert_eq!(low.end, Bound::Excluded(-0.2));
    /// ```
    #[must_use]
    pub fn from_row(thresholds: &[f64], idx: usize, orientation: Orientation) -> Self {
        // The -inf sentinel calls the same set as the lowest finite threshold
        let idx = match thresholds.get(idx + 1) {
            Some(next)
                if thresholds[idx].is_infinite()
                    && thresholds[idx].is_sign_negative()
                    && next.is_finite() =>
            {
                idx + 1
            }
            _ => idx,
        };
        let upper = thresholds[idx];
        let lower = idx
            .checked_sub(1)
            .map(|prev| thresholds[prev])
            .filter(|t| t.is_finite());
        match orientation {
            Orientation::High => Self {
                start: lower.map_or(Bound::Unbounded, Bound::Excluded),
                end: Bound::Included(upper),
            },
            Orientation::Low => Self {
                start: Bound::Included(orientation.to_original(upper)),
                end: lower.map_or(Bound::Unbounded, |t| {
                    Bound::Excluded(orientation.to_original(t))
                }),
            },
        }
    }
}

impl std::ops::RangeBounds<f64> for ThresholdRange {
    fn start_bound(&self) -> Bound<&f64> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&f64> {
        self.end.as_ref()
    }
}

impl fmt::Display for ThresholdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Bound::Included(v) => write!(f, "[{v}")?,
            Bound::Excluded(v) => write!(f, "({v}")?,
            Bound::Unbounded => write!(f, "(-inf")?,
        }
        match self.end {
            Bound::Included(v) => write!(f, ", {v}]"),
            Bound::Excluded(v) => write!(f, ", {v})"),
            Bound::Unbounded => write!(f, ", inf)"),
        }
    }
}

impl serde::Serialize for ThresholdRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(serde::Serialize)]
        struct Repr {
            start: Option<f64>,
            start_inclusive: bool,
            end: Option<f64>,
            end_inclusive: bool,
            display: String,
        }

        let split = |bound: Bound<f64>| match bound {
            Bound::Included(v) => (Some(v), true),
            Bound::Excluded(v) => (Some(v), false),
            Bound::Unbounded => (None, false),
        };
        let (start, start_inclusive) = split(self.start);
        let (end, end_inclusive) = split(self.end);
        Repr {
            start,
            start_inclusive,
            end,
            end_inclusive,
            display: self.to_string(),
        }
        .serialize(serializer)
    }
}

//! Confusion counts at every distinct score threshold.
//!
//! A sweep table has one row per distinct non-missing score plus two
//! sentinels: `-inf` (every scored sample is called positive) and `+inf`
//! (nothing is). Rows are ordered by ascending threshold, and a sample is
//! called positive when its score is greater than or equal to the threshold.
//!
//! Samples with a missing score take no part in any count, so the positive
//! and negative totals are those of the scored samples only.
//!
//! # Examples
//!
//! ```
//! use prcband_engine::{Orientation, SweepTable};
//!
//! let truth = [true, true, true, false, false];
//! let scores = [Some(0.9), Some(0.8), Some(0.3), Some(0.7), Some(0.1)];
//! let table = SweepTable::build(&truth, &scores, Orientation::High).unwrap();
//!
//! // -inf, five distinct scores, +inf
//! assert_eq!(table.rows().len(), 7);
//!
//! let row = table.rows().iter().find(|r| r.threshold == 0.7).unwrap();
//! assert_eq!((row.tp, row.fp, row.fn_, row.tn), (2, 1, 1, 1));
//! ```

use std::cmp::Ordering;

use prcband_stats::integrate::trapezoid;

use crate::{
    InputError,
    precision::{self, PrecisionConfig},
    rate::RateCounts,
};

/// Which end of the score range indicates the positive class.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Larger scores are more positive.
    #[default]
    High,
    /// Smaller scores are more positive.
    Low,
}

impl Orientation {
    /// Maps a score onto the internal scale where larger is more positive.
    #[must_use]
    pub fn to_internal(self, score: f64) -> f64 {
        match self {
            Self::High => score,
            Self::Low => -score,
        }
    }

    /// Maps an internal threshold back onto the original score scale.
    #[must_use]
    pub fn to_original(self, threshold: f64) -> f64 {
        // Negation is its own inverse
        self.to_internal(threshold)
    }
}

/// Confusion counts and derived rates at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SweepRow {
    /// Threshold on the internal (larger is more positive) scale.
    pub threshold: f64,
    pub tp: u64,
    pub tn: u64,
    pub fp: u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
    /// `tp / (tp + fp)`, NaN when nothing is called positive.
    pub precision: f64,
    /// `tp / (tp + fn)`, also known as sensitivity.
    pub recall: f64,
    /// `fp / (fp + tn)`, i.e. `1 - specificity`.
    pub fallout: f64,
}

impl SweepRow {
    #[expect(clippy::cast_precision_loss)]
    fn new(threshold: f64, tp: u64, fp: u64, positives: u64, negatives: u64) -> Self {
        let fn_ = positives - tp;
        let tn = negatives - fp;
        Self {
            threshold,
            tp,
            tn,
            fp,
            fn_,
            precision: tp as f64 / (tp + fp) as f64,
            recall: tp as f64 / positives as f64,
            fallout: fp as f64 / negatives as f64,
        }
    }

    /// Counts behind the precision estimate: `(tp, tp + fp)`.
    #[must_use]
    pub fn precision_counts(&self) -> RateCounts {
        RateCounts::new(self.tp, self.tp + self.fp)
    }

    /// Counts behind the recall estimate: `(tp, tp + fn)`.
    #[must_use]
    pub fn recall_counts(&self) -> RateCounts {
        RateCounts::new(self.tp, self.tp + self.fn_)
    }
}

/// Threshold sweep of one classifier against the ground truth.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SweepTable {
    positives: u64,
    negatives: u64,
    rows: Vec<SweepRow>,
}

impl SweepTable {
    /// Builds the sweep table for one score column.
    ///
    /// Scores are flipped according to `orientation` before sweeping, so
    /// thresholds are always on the larger-is-more-positive scale. NaN and
    /// infinite scores are treated as missing, which keeps the `±inf`
    /// sentinels the only infinite thresholds.
    ///
    /// # Errors
    ///
    /// Fails with [`InputError::ShapeMismatch`] if `truth` and `scores` differ
    /// in length.
    pub fn build(
        truth: &[bool],
        scores: &[Option<f64>],
        orientation: Orientation,
    ) -> Result<Self, InputError> {
        if truth.len() != scores.len() {
            return Err(InputError::ShapeMismatch {
                what: "scores".to_owned(),
                expected: truth.len(),
                found: scores.len(),
            });
        }
        let scored = truth
            .iter()
            .zip(scores)
            .filter_map(|(&label, score)| {
                score
                    .filter(|s| s.is_finite())
                    .map(|s| (orientation.to_internal(s), label))
            })
            .collect();
        Ok(Self::from_scored(scored))
    }

    /// Builds a table from `(internal score, label)` pairs with no missing
    /// values.
    pub(crate) fn from_scored(mut scored: Vec<(f64, bool)>) -> Self {
        let positives = scored.iter().filter(|(_, label)| *label).count() as u64;
        let negatives = scored.len() as u64 - positives;

        // Highest score first, so each group extends the positive call set
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut cumulative = vec![];
        let (mut tp, mut fp) = (0, 0);
        for group in scored.chunk_by(|a, b| a.0.total_cmp(&b.0) == Ordering::Equal) {
            let group_tp = group.iter().filter(|(_, label)| *label).count() as u64;
            tp += group_tp;
            fp += group.len() as u64 - group_tp;
            cumulative.push((group[0].0, tp, fp));
        }

        let mut rows = Vec::with_capacity(cumulative.len() + 2);
        rows.push(SweepRow::new(
            f64::NEG_INFINITY,
            positives,
            negatives,
            positives,
            negatives,
        ));
        rows.extend(
            cumulative
                .iter()
                .rev()
                .map(|&(threshold, tp, fp)| SweepRow::new(threshold, tp, fp, positives, negatives)),
        );
        let mut last = SweepRow::new(f64::INFINITY, 0, 0, positives, negatives);
        last.precision = rows[rows.len() - 1].precision;
        rows.push(last);

        Self {
            positives,
            negatives,
            rows,
        }
    }

    /// Rows in ascending threshold order, from `-inf` to `+inf`.
    #[must_use]
    pub fn rows(&self) -> &[SweepRow] {
        &self.rows
    }

    /// Number of scored positive samples (`tp + fn` on every row).
    #[must_use]
    pub fn positives(&self) -> u64 {
        self.positives
    }

    /// Number of scored negative samples (`fp + tn` on every row).
    #[must_use]
    pub fn negatives(&self) -> u64 {
        self.negatives
    }

    /// Fraction of positives among scored samples, i.e. the precision of the
    /// first row.
    #[must_use]
    pub fn prior(&self) -> f64 {
        self.rows[0].precision
    }

    #[must_use]
    pub fn thresholds(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.threshold).collect()
    }

    #[must_use]
    pub fn precision(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.precision).collect()
    }

    #[must_use]
    pub fn recall(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.recall).collect()
    }

    #[must_use]
    pub fn fallout(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.fallout).collect()
    }

    /// Precision after optional balancing against this table's prior and
    /// optional monotonization.
    #[must_use]
    pub fn configured_precision(&self, config: &PrecisionConfig) -> Vec<f64> {
        precision::configure(&self.precision(), self.prior(), config)
    }

    /// Area under the ROC curve (recall against fallout).
    #[must_use]
    pub fn auroc(&self) -> f64 {
        trapezoid(&self.fallout(), &self.recall())
    }

    /// Area under the precision-recall curve using configured precision.
    #[must_use]
    pub fn auprc(&self, config: &PrecisionConfig) -> f64 {
        trapezoid(&self.recall(), &self.configured_precision(config))
    }

    /// Index of the first row whose configured precision is strictly above
    /// `cutoff`.
    #[must_use]
    pub fn first_row_above(&self, cutoff: f64, config: &PrecisionConfig) -> Option<usize> {
        self.configured_precision(config)
            .iter()
            .position(|&p| p > cutoff)
    }

    /// Recall at the first threshold where configured precision exceeds
    /// `cutoff`, or `None` if it never does.
    #[must_use]
    pub fn recall_at_precision(&self, cutoff: f64, config: &PrecisionConfig) -> Option<f64> {
        self.first_row_above(cutoff, config)
            .map(|idx| self.rows[idx].recall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> SweepTable {
        let truth = [true, true, true, false, false];
        let scores = [Some(0.9), Some(0.8), Some(0.3), Some(0.7), Some(0.1)];
        SweepTable::build(&truth, &scores, Orientation::High).unwrap()
    }

    fn row_at(table: &SweepTable, threshold: f64) -> SweepRow {
        *table
            .rows()
            .iter()
            .find(|r| r.threshold == threshold)
            .unwrap()
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let table = scenario();
        let row = row_at(&table, 0.7);
        assert_eq!((row.tp, row.fp, row.fn_, row.tn), (2, 1, 1, 1));
        let row = row_at(&table, 0.8);
        assert_eq!((row.tp, row.fp, row.fn_, row.tn), (2, 0, 1, 2));
    }

    #[test]
    fn test_sentinel_rows() {
        let table = scenario();
        let rows = table.rows();
        let first = rows[0];
        assert_eq!(first.threshold, f64::NEG_INFINITY);
        assert_eq!((first.tp, first.fp), (3, 2));
        assert_eq!(first.recall, 1.0);
        assert_eq!(first.fallout, 1.0);

        let last = rows[rows.len() - 1];
        assert_eq!(last.threshold, f64::INFINITY);
        assert_eq!((last.tp, last.fp), (0, 0));
        assert_eq!(last.precision, rows[rows.len() - 2].precision);
        assert_eq!(last.recall, 0.0);
    }

    #[test]
    fn test_totals_are_conserved() {
        let table = scenario();
        for row in table.rows() {
            assert_eq!(row.tp + row.fn_, table.positives());
            assert_eq!(row.fp + row.tn, table.negatives());
        }
    }

    #[test]
    fn test_rates_are_bounded_and_monotone() {
        let truth = [true, false, true, true, false, false, true, false];
        let scores = [
            Some(0.1),
            Some(0.4),
            Some(0.4),
            None,
            Some(0.9),
            Some(0.2),
            Some(0.6),
            Some(f64::NAN),
        ];
        let table = SweepTable::build(&truth, &scores, Orientation::High).unwrap();
        assert_eq!(table.positives(), 3);
        assert_eq!(table.negatives(), 3);
        for row in table.rows() {
            for rate in [row.precision, row.recall, row.fallout] {
                assert!(rate.is_nan() || (0.0..=1.0).contains(&rate));
            }
        }
        for pair in table.rows().windows(2) {
            assert!(pair[0].threshold < pair[1].threshold);
            assert!(pair[0].recall >= pair[1].recall);
            assert!(pair[0].fallout >= pair[1].fallout);
        }
    }

    #[test]
    fn test_ties_share_a_row() {
        let truth = [true, false, true];
        let scores = [Some(0.5), Some(0.5), Some(0.2)];
        let table = SweepTable::build(&truth, &scores, Orientation::High).unwrap();
        assert_eq!(table.rows().len(), 4);
        let row = row_at(&table, 0.5);
        assert_eq!((row.tp, row.fp), (1, 1));
    }

    #[test]
    fn test_low_orientation_flips_scores() {
        let truth = [true, false];
        let scores = [Some(1.0), Some(5.0)];
        let high = SweepTable::build(&truth, &scores, Orientation::High).unwrap();
        let low = SweepTable::build(&truth, &scores, Orientation::Low).unwrap();
        assert_eq!(high.auroc(), 0.0);
        assert_eq!(low.auroc(), 1.0);
        assert_eq!(low.thresholds()[1], -5.0);
    }

    #[test]
    fn test_perfect_separation_auroc() {
        let truth = [true, true, false, false];
        let scores = [Some(1.0), Some(1.0), Some(0.0), Some(0.0)];
        let table = SweepTable::build(&truth, &scores, Orientation::High).unwrap();
        assert_eq!(table.auroc(), 1.0);
        assert_eq!(table.auprc(&PrecisionConfig::default()), 1.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = SweepTable::build(&[true, false], &[Some(1.0)], Orientation::High).unwrap_err();
        assert_eq!(
            err,
            InputError::ShapeMismatch {
                what: "scores".to_owned(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_infinite_scores_are_missing() {
        let truth = [true, true, false, false];
        let scores = [
            Some(f64::INFINITY),
            Some(0.5),
            Some(0.2),
            Some(f64::NEG_INFINITY),
        ];
        for orientation in [Orientation::High, Orientation::Low] {
            let table = SweepTable::build(&truth, &scores, orientation).unwrap();
            assert_eq!((table.positives(), table.negatives()), (1, 1));
            let thresholds = table.rows().iter().map(|r| r.threshold).collect::<Vec<_>>();
            assert_eq!(thresholds.len(), 4);
            assert_eq!(thresholds[0], f64::NEG_INFINITY);
            assert_eq!(thresholds[3], f64::INFINITY);
            assert!(thresholds.windows(2).all(|w| w[0] < w[1]), "{thresholds:?}");
        }
    }

    #[test]
    fn test_all_missing_scores() {
        let table = SweepTable::build(&[true, false], &[None, None], Orientation::High).unwrap();
        assert_eq!(table.rows().len(), 2);
        assert!(table.prior().is_nan());
        assert!(table.rows()[0].recall.is_nan());
        assert_eq!(table.auroc(), 0.0);
    }

    #[test]
    fn test_recall_at_precision() {
        let table = scenario();
        let config = PrecisionConfig::default();
        assert_eq!(table.recall_at_precision(0.9, &config), Some(2.0 / 3.0));
        // Precision is 1 at most, so nothing is strictly above it
        assert_eq!(table.recall_at_precision(1.0, &config), None);

        let truth = [true, false, true, false];
        let scores = [Some(0.9), Some(0.8), Some(0.3), Some(0.7)];
        let weak = SweepTable::build(&truth, &scores, Orientation::High).unwrap();
        assert_eq!(weak.recall_at_precision(0.9, &PrecisionConfig::default()), Some(0.5));
        let unsorted = PrecisionConfig {
            monotonized: false,
            balanced: false,
        };
        let mixed = SweepTable::build(
            &[false, true, false],
            &[Some(0.9), Some(0.5), Some(0.1)],
            Orientation::High,
        )
        .unwrap();
        assert_eq!(mixed.recall_at_precision(0.9, &unsorted), None);
    }
}

//! Named classifiers evaluated against one shared ground truth.

use std::collections::HashSet;

use crate::{
    InputError,
    precision::PrecisionConfig,
    sweep::{Orientation, SweepTable},
    threshold::ThresholdRange,
};

/// Raw scores of one classifier, before sweeping.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreColumn {
    pub name: String,
    pub orientation: Orientation,
    /// One score per label; `None` marks a missing score.
    pub scores: Vec<Option<f64>>,
}

impl ScoreColumn {
    pub fn new(
        name: impl Into<String>,
        orientation: Orientation,
        scores: Vec<Option<f64>>,
    ) -> Self {
        Self {
            name: name.into(),
            orientation,
            scores,
        }
    }
}

/// A classifier with its precomputed sweep table.
#[derive(Debug, Clone)]
pub struct Classifier {
    name: String,
    orientation: Orientation,
    table: SweepTable,
}

impl Classifier {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn table(&self) -> &SweepTable {
        &self.table
    }

    /// Score interval over which the call set matches the first row with
    /// configured precision above `cutoff`, on the original score scale.
    #[must_use]
    pub fn threshold_range(&self, cutoff: f64, config: &PrecisionConfig) -> Option<ThresholdRange> {
        let idx = self.table.first_row_above(cutoff, config)?;
        Some(ThresholdRange::from_row(
            &self.table.thresholds(),
            idx,
            self.orientation,
        ))
    }
}

/// Ordered set of uniquely named classifiers sharing one ground truth.
///
/// Sweep tables are built once, when the collection is created.
#[derive(Debug, Clone)]
pub struct ClassifierCollection {
    truth: Vec<bool>,
    classifiers: Vec<Classifier>,
}

impl ClassifierCollection {
    /// Validates the columns against `truth` and sweeps each one.
    ///
    /// # Errors
    ///
    /// - [`InputError::Empty`] if `columns` is empty
    /// - [`InputError::DuplicateName`] if two columns share a name
    /// - [`InputError::ShapeMismatch`] if a column's length differs from
    ///   `truth`
    pub fn new(truth: Vec<bool>, columns: Vec<ScoreColumn>) -> Result<Self, InputError> {
        if columns.is_empty() {
            return Err(InputError::Empty);
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(InputError::DuplicateName {
                    name: column.name.clone(),
                });
            }
        }

        let classifiers = columns
            .into_iter()
            .map(|column| {
                let table = SweepTable::build(&truth, &column.scores, column.orientation).map_err(
                    |err| match err {
                        InputError::ShapeMismatch {
                            expected, found, ..
                        } => InputError::ShapeMismatch {
                            what: format!("scores of {}", column.name),
                            expected,
                            found,
                        },
                        err => err,
                    },
                )?;
                log::debug!(
                    "swept {}: {} thresholds, {} positives, {} negatives",
                    column.name,
                    table.rows().len(),
                    table.positives(),
                    table.negatives()
                );
                Ok(Classifier {
                    name: column.name,
                    orientation: column.orientation,
                    table,
                })
            })
            .collect::<Result<Vec<_>, InputError>>()?;

        Ok(Self { truth, classifiers })
    }

    /// Builds a collection from parallel name, orientation and score lists.
    ///
    /// # Errors
    ///
    /// Fails with [`InputError::ShapeMismatch`] if `orientations` or `scores`
    /// do not have one entry per name, and otherwise as [`Self::new`].
    pub fn from_parts(
        truth: Vec<bool>,
        names: Vec<String>,
        orientations: Vec<Orientation>,
        scores: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, InputError> {
        for (what, found) in [("orientations", orientations.len()), ("scores", scores.len())] {
            if found != names.len() {
                return Err(InputError::ShapeMismatch {
                    what: what.to_owned(),
                    expected: names.len(),
                    found,
                });
            }
        }
        let columns = names
            .into_iter()
            .zip(orientations)
            .zip(scores)
            .map(|((name, orientation), scores)| ScoreColumn {
                name,
                orientation,
                scores,
            })
            .collect();
        Self::new(truth, columns)
    }

    #[must_use]
    pub fn truth(&self) -> &[bool] {
        &self.truth
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Classifier> {
        self.classifiers.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Classifier> {
        self.classifiers.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classifiers.iter().map(Classifier::name)
    }

    /// AUROC of each classifier, in collection order.
    #[must_use]
    pub fn auroc(&self) -> Vec<f64> {
        self.iter().map(|c| c.table().auroc()).collect()
    }

    /// AUPRC of each classifier, in collection order.
    #[must_use]
    pub fn auprc(&self, config: &PrecisionConfig) -> Vec<f64> {
        self.iter().map(|c| c.table().auprc(config)).collect()
    }

    /// Recall at precision `cutoff` of each classifier, in collection order.
    #[must_use]
    pub fn recall_at_precision(&self, cutoff: f64, config: &PrecisionConfig) -> Vec<Option<f64>> {
        self.iter()
            .map(|c| c.table().recall_at_precision(cutoff, config))
            .collect()
    }

    /// Threshold range at precision `cutoff` of each classifier, in collection
    /// order.
    #[must_use]
    pub fn threshold_ranges(
        &self,
        cutoff: f64,
        config: &PrecisionConfig,
    ) -> Vec<Option<ThresholdRange>> {
        self.iter()
            .map(|c| c.threshold_range(cutoff, config))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ClassifierCollection {
    type Item = &'a Classifier;
    type IntoIter = std::slice::Iter<'a, Classifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.classifiers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truth() -> Vec<bool> {
        vec![true, true, false, false]
    }

    fn column(name: &str, scores: [f64; 4]) -> ScoreColumn {
        ScoreColumn::new(name, Orientation::High, scores.map(Some).to_vec())
    }

    #[test]
    fn test_lookup_and_order() {
        let collection = ClassifierCollection::new(
            truth(),
            vec![
                column("b", [0.9, 0.8, 0.2, 0.1]),
                column("a", [0.1, 0.2, 0.8, 0.9]),
            ],
        )
        .unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.names().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(collection.auroc(), [1.0, 0.0]);
        assert!(collection.get("a").is_some());
        assert!(collection.get("c").is_none());
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert_eq!(
            ClassifierCollection::new(truth(), vec![]).unwrap_err(),
            InputError::Empty
        );
        let err = ClassifierCollection::new(
            truth(),
            vec![
                column("a", [0.0; 4]),
                column("a", [1.0; 4]),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            InputError::DuplicateName {
                name: "a".to_owned()
            }
        );
    }

    #[test]
    fn test_shape_mismatch_names_the_column() {
        let err = ClassifierCollection::new(
            truth(),
            vec![ScoreColumn::new("short", Orientation::High, vec![Some(0.5)])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            InputError::ShapeMismatch {
                what: "scores of short".to_owned(),
                expected: 4,
                found: 1,
            }
        );
    }

    #[test]
    fn test_from_parts_checks_lengths() {
        let err = ClassifierCollection::from_parts(
            truth(),
            vec!["a".to_owned(), "b".to_owned()],
            vec![Orientation::High],
            vec![vec![None; 4], vec![None; 4]],
        )
        .unwrap_err();
        assert!(matches!(err, InputError::ShapeMismatch { found: 1, .. }));

        let ok = ClassifierCollection::from_parts(
            truth(),
            vec!["a".to_owned()],
            vec![Orientation::Low],
            vec![vec![Some(0.1), Some(0.2), Some(0.8), Some(0.9)]],
        )
        .unwrap();
        assert_eq!(ok.auroc(), [1.0]);
    }

    #[test]
    fn test_recall_at_precision_per_classifier() {
        let collection = ClassifierCollection::new(
            truth(),
            vec![
                column("good", [0.9, 0.8, 0.2, 0.1]),
                column("bad", [0.1, 0.2, 0.8, 0.9]),
            ],
        )
        .unwrap();
        let config = PrecisionConfig {
            monotonized: false,
            balanced: false,
        };
        assert_eq!(
            collection.recall_at_precision(0.9, &config),
            [Some(1.0), None]
        );
    }
}

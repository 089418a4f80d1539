//! JSON datasets of labels and classifier scores.
//!
//! ```json
//! {
//!   "truth": [true, false, true],
//!   "classifiers": [
//!     { "name": "model-a", "high": true, "scores": [0.9, null, 0.4] }
//!   ]
//! }
//! ```
//!
//! `high` defaults to `true`. A `null` score marks a missing value. Values
//! are checked element by element, so errors point at the offending entry.

use crate::{ClassifierCollection, InputError, ScoreColumn, sweep::Orientation};

/// A dataset as it appears on disk, before type checks.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RawDataset {
    pub truth: Vec<serde_json::Value>,
    pub classifiers: Vec<RawClassifier>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RawClassifier {
    pub name: String,
    #[serde(default = "default_high")]
    pub high: bool,
    pub scores: Vec<serde_json::Value>,
}

fn default_high() -> bool {
    true
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DatasetError {
    #[display("malformed dataset JSON")]
    Parse(serde_json::Error),
    #[display("invalid dataset")]
    Input(InputError),
}

/// Labels and score columns that passed type and shape checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub truth: Vec<bool>,
    pub columns: Vec<ScoreColumn>,
}

impl Dataset {
    /// Parses and checks a dataset from a JSON value.
    ///
    /// # Examples
    ///
    /// ```
    /// use prcband_engine::dataset::Dataset;
    ///
    /// let value = serde_json::json!({
    ///     "truth": [true, false],
    ///     "classifiers": [{ "name": "m", "high": false, "scores": [0.1, null] }]
    /// });
    /// let dataset = Dataset::from_json_value(value).unwrap();
    /// assert_eq!(dataset.columns[0].scores, [Some(0.1), None]);
    ///
    /// let collection = dataset.into_collection().unwrap();
    /// assert_eq!(collection.len(), 1);
    /// ```
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, DatasetError> {
        let raw = serde_json::from_value::<RawDataset>(value)?;
        Ok(Self::try_from(raw)?)
    }

    /// Sweeps every column into a [`ClassifierCollection`].
    pub fn into_collection(self) -> Result<ClassifierCollection, InputError> {
        ClassifierCollection::new(self.truth, self.columns)
    }
}

impl TryFrom<RawDataset> for Dataset {
    type Error = InputError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        let truth = raw
            .truth
            .iter()
            .enumerate()
            .map(|(index, value)| {
                value.as_bool().ok_or_else(|| InputError::TypeMismatch {
                    what: "truth".to_owned(),
                    index,
                    expected: "a boolean",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let columns = raw
            .classifiers
            .into_iter()
            .map(|classifier| {
                if classifier.scores.len() != truth.len() {
                    return Err(InputError::ShapeMismatch {
                        what: format!("scores of {}", classifier.name),
                        expected: truth.len(),
                        found: classifier.scores.len(),
                    });
                }
                let scores = classifier
                    .scores
                    .iter()
                    .enumerate()
                    .map(|(index, value)| parse_score(&classifier.name, index, value))
                    .collect::<Result<Vec<_>, _>>()?;
                let orientation = if classifier.high {
                    Orientation::High
                } else {
                    Orientation::Low
                };
                Ok(ScoreColumn::new(classifier.name, orientation, scores))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { truth, columns })
    }
}

fn parse_score(
    name: &str,
    index: usize,
    value: &serde_json::Value,
) -> Result<Option<f64>, InputError> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(number) => Ok(number.as_f64().filter(|v| v.is_finite())),
        _ => Err(InputError::TypeMismatch {
            what: format!("scores of {name}"),
            index,
            expected: "a number or null",
        }),
    }
}

//! Precision-recall and ROC curve inference for binary classifiers.
//!
//! This crate turns ground-truth labels and per-classifier scores into
//! threshold sweep tables, then quantifies the uncertainty of the resulting
//! curves from the binomial likelihood of the observed counts.
//!
//! # Workflow
//!
//! 1. **Sweep**: [`SweepTable::build`] computes confusion counts and rates at
//!    every distinct score threshold
//! 2. **Resample**: [`path::sample_paths`] draws random precision/recall paths,
//!    optionally constrained to stay monotone across thresholds
//! 3. **Aggregate**: [`band::infer_band`] bins the paths along recall and
//!    extracts a confidence band on precision
//! 4. **Compare**: [`significance::auprc_significance`] and
//!    [`null::random_pvalues`] test AUPRC differences between classifiers and
//!    against chance
//!
//! All randomness comes from an [`rand::Rng`] supplied by the caller, so a
//! seeded generator reproduces every result.
//!
//! # Examples
//!
//! ```
//! use prcband_engine::{
//!     ClassifierCollection, Orientation, ScoreColumn, precision::PrecisionConfig,
//! };
//!
//! let truth = vec![true, true, true, false, false];
//! let column = ScoreColumn::new(
//!     "model",
//!     Orientation::High,
//!     vec![Some(0.9), Some(0.8), Some(0.3), Some(0.7), Some(0.1)],
//! );
//! let collection = ClassifierCollection::new(truth, vec![column]).unwrap();
//!
//! let classifier = collection.get("model").unwrap();
//! assert!(classifier.table().auroc() > 0.5);
//! assert!(classifier.table().auprc(&PrecisionConfig::default()) > 0.5);
//! ```

pub use self::{
    collection::{Classifier, ClassifierCollection, ScoreColumn},
    sweep::{Orientation, SweepRow, SweepTable},
};

pub mod band;
pub mod collection;
pub mod dataset;
pub mod interval;
pub mod null;
pub mod path;
pub mod precision;
pub mod rate;
pub mod sampler;
pub mod significance;
pub mod sweep;
pub mod threshold;

/// Invalid labels, scores, or classifier metadata.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InputError {
    #[display("{what} has {found} entries, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[display("{what}[{index}] must be {expected}")]
    TypeMismatch {
        what: String,
        index: usize,
        expected: &'static str,
    },
    #[display("duplicate classifier name: {name}")]
    DuplicateName { name: String },
    #[display("at least one classifier is required")]
    Empty,
}

//! Numerical building blocks for the prcband workspace.
//!
//! This crate holds the domain-free statistics used when evaluating classifier
//! curves:
//!
//! - **Integration**: Trapezoid-rule area under an ordered polyline
//! - **Percentiles**: Linearly interpolated quantiles of a sample
//! - **Binning**: Equal-width partitioning of a closed interval
//! - **Empirical CDF**: Step-function CDF over a finite sample
//! - **Descriptive statistics**: Mean, median, variance, standard deviation, etc.
//!
//! # Modules
//!
//! - [`integrate`]: Trapezoid-rule integration in point order
//! - [`percentiles`]: Interpolated percentiles of sorted samples
//! - [`binning`]: Equal-width bins over a value range
//! - [`ecdf`]: Empirical cumulative distribution functions
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Integrating a curve
//!
//! ```
//! use prcband_stats::integrate::trapezoid;
//!
//! let xs = [0.0, 0.5, 1.0];
//! let ys = [1.0, 1.0, 1.0];
//! assert_eq!(trapezoid(&xs, &ys), 1.0);
//! ```
//!
//! ## Computing percentiles
//!
//! ```
//! use prcband_stats::percentiles::compute_percentile;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! assert_eq!(compute_percentile(&values, 50.0), 3.0);
//! assert_eq!(compute_percentile(&values, 87.5), 4.5);
//! ```
//!
//! ## Binning values
//!
//! ```
//! use prcband_stats::binning::EqualWidthBins;
//!
//! let bins = EqualWidthBins::new(0.0, 1.0, 4);
//! assert_eq!(bins.index_of(0.3), Some(1));
//! assert_eq!(bins.center(1), 0.375);
//! ```
//!
//! ## Evaluating an empirical CDF
//!
//! ```
//! use prcband_stats::ecdf::Ecdf;
//!
//! let ecdf = Ecdf::new([0.2, 0.4, 0.6, 0.8]);
//! assert_eq!(ecdf.fraction_below(0.5), 0.5);
//! ```

pub mod binning;
pub mod descriptive;
pub mod ecdf;
pub mod integrate;
pub mod percentiles;

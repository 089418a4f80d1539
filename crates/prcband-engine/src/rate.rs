//! Success counts, rate windows, and the binomial likelihood over rates.
//!
//! Precision and recall are both success rates estimated from counts:
//! precision from `(tp, tp + fp)` and recall from `(tp, tp + fn)`. Everything
//! that resamples or bounds those rates works on the binomial likelihood
//! `L(r) ∝ r^i (1 - r)^(n - i)` of observing `i` successes in `n` trials.
//!
//! Likelihoods are evaluated in log space and reported relative to their peak
//! at the maximum-likelihood rate `i / n`, so large counts never underflow.

/// Observed successes out of a number of trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RateCounts {
    /// Number of successes (`i`).
    pub successes: u64,
    /// Number of trials (`n`).
    pub trials: u64,
}

impl RateCounts {
    #[must_use]
    pub const fn new(successes: u64, trials: u64) -> Self {
        Self { successes, trials }
    }

    /// Returns `true` if `successes <= trials`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.successes <= self.trials
    }

    /// Number of failures (`n - i`).
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.trials.saturating_sub(self.successes)
    }

    /// Maximum-likelihood rate `i / n`, NaN when there are no trials.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mle(&self) -> f64 {
        self.successes as f64 / self.trials as f64
    }

    /// Log of the unnormalized binomial likelihood at `rate`.
    ///
    /// Uses the convention `0 * ln(0) = 0`, so zero successes at rate 0 (and
    /// zero failures at rate 1) contribute nothing instead of NaN.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ln_likelihood(&self, rate: f64) -> f64 {
        xlny(self.successes as f64, rate) + xlny(self.failures() as f64, 1.0 - rate)
    }

    /// Likelihood at `rate` divided by the likelihood at the mode.
    ///
    /// The result lies in `[0, 1]` and equals 1 at `i / n`. With zero trials
    /// the likelihood is flat and the ratio is 1 everywhere.
    ///
    /// # Examples
    ///
    /// ```
    /// use prcband_engine::rate::RateCounts;
    ///
    /// let counts = RateCounts::new(3, 4);
    /// assert!((counts.relative_likelihood(0.75) - 1.0).abs() < 1e-12);
    /// assert!(counts.relative_likelihood(0.1) < 0.05);
    /// assert_eq!(RateCounts::new(0, 0).relative_likelihood(0.9), 1.0);
    /// ```
    #[must_use]
    pub fn relative_likelihood(&self, rate: f64) -> f64 {
        if self.trials == 0 {
            return 1.0;
        }
        (self.ln_likelihood(rate) - self.ln_likelihood(self.mle())).exp()
    }

    /// Standard deviation of the uniform-prior posterior `Beta(i + 1, n - i + 1)`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn posterior_sd(&self) -> f64 {
        let alpha = self.successes as f64 + 1.0;
        let beta = self.failures() as f64 + 1.0;
        let total = alpha + beta;
        (alpha * beta / (total * total * (total + 1.0))).sqrt()
    }
}

fn xlny(x: f64, y: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x * y.ln() }
}

/// A closed interval `[min, max]` inside `[0, 1]` that a sampled rate must
/// fall into.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RateWindow {
    min: f64,
    max: f64,
}

impl Default for RateWindow {
    fn default() -> Self {
        Self::FULL
    }
}

impl RateWindow {
    /// The unconstrained window `[0, 1]`.
    pub const FULL: Self = Self { min: 0.0, max: 1.0 };

    /// Creates a window, returning `None` unless `0 <= min <= max <= 1`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Option<Self> {
        ((0.0..=1.0).contains(&min) && (0.0..=1.0).contains(&max) && min <= max)
            .then_some(Self { min, max })
    }

    /// The window `[min, 1]`, with `min` clamped into `[0, 1]`.
    ///
    /// NaN lower bounds leave the window unconstrained.
    #[must_use]
    pub fn at_least(min: f64) -> Self {
        if min.is_nan() {
            return Self::FULL;
        }
        Self {
            min: min.clamp(0.0, 1.0),
            max: 1.0,
        }
    }

    /// The window `[0, max]`, with `max` clamped into `[0, 1]`.
    ///
    /// NaN upper bounds leave the window unconstrained.
    #[must_use]
    pub fn at_most(max: f64) -> Self {
        if max.is_nan() {
            return Self::FULL;
        }
        Self {
            min: 0.0,
            max: max.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns `true` for `[0, 1]`.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.min <= 0.0 && self.max >= 1.0
    }

    /// Returns `true` when the window holds a single rate.
    #[must_use]
    pub fn is_point(&self) -> bool {
        self.min >= self.max
    }

    /// Maps `t` in `[0, 1)` linearly onto the window.
    #[must_use]
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + (self.max - self.min) * t
    }
}

//! Random draws of success rates from the binomial likelihood.
//!
//! A sampled rate for counts `(i, n)` follows the posterior of a binomial rate
//! under a uniform prior, optionally restricted to a [`RateWindow`]. Two
//! samplers are provided:
//!
//! - [`accurate`]: exact Beta draws when unconstrained, single-draw rejection
//!   sampling inside a window
//! - [`quick`]: batch rejection sampling that trades tail exactness for
//!   throughput at large sample counts
//!
//! # Termination
//!
//! Rejection sampling inside a window that holds almost none of the
//! likelihood mass would loop for a very long time. Both samplers therefore
//! apply the same shortcut: when the window lies entirely on one side of the
//! maximum-likelihood rate and the relative likelihood at its nearest edge is
//! below [`SHORTCUT_LIKELIHOOD_RATIO`], the edge itself is returned.
//!
//! Candidates are proposed uniformly, but only over the part of the window
//! within [`PROPOSAL_SPREAD`] posterior standard deviations of the mode. With
//! millions of trials the likelihood is a spike far narrower than most
//! windows, and proposing over the whole window would reject nearly every
//! candidate. Every remaining loop is capped and fails with
//! [`SamplingError::NonTermination`].
//!
//! # Examples
//!
//! ```
//! use prcband_engine::{
//!     rate::{RateCounts, RateWindow},
//!     sampler::SamplingPolicy,
//! };
//!
//! let mut rng = rand::rng();
//! let counts = RateCounts::new(30, 40);
//! let windows = vec![RateWindow::at_least(0.6); 100];
//! let draws = SamplingPolicy::Quick.sample(&mut rng, counts, &windows).unwrap();
//!
//! assert_eq!(draws.len(), 100);
//! assert!(draws.iter().all(|r| (0.6..=1.0).contains(r)));
//! ```

use rand::Rng;

use crate::rate::{RateCounts, RateWindow};

pub mod accurate;
pub mod quick;

/// Relative likelihood below which a window edge is returned without sampling.
pub const SHORTCUT_LIKELIHOOD_RATIO: f64 = 0.05;

/// Half-width of the proposal range, in posterior standard deviations.
pub const PROPOSAL_SPREAD: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SamplingError {
    #[display(
        "rejection sampling did not terminate for {} successes out of {} trials after {attempts} candidates",
        counts.successes,
        counts.trials
    )]
    NonTermination {
        counts: RateCounts,
        attempts: usize,
    },
    #[display("invalid counts: {} successes out of {} trials", counts.successes, counts.trials)]
    InvalidCounts {
        counts: RateCounts,
    },
}

/// Which rate sampler to use.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, serde::Serialize)]
pub enum SamplingPolicy {
    /// Exact Beta draws and single-draw rejection sampling.
    Accurate,
    /// Batch rejection sampling.
    #[default]
    Quick,
}

impl SamplingPolicy {
    /// Draws one rate per window.
    ///
    /// With [`Self::Quick`], windows that are all identical are sampled as
    /// one batch; differing windows are sampled slot by slot in vectorized
    /// rejection rounds.
    pub fn sample<R>(
        self,
        rng: &mut R,
        counts: RateCounts,
        windows: &[RateWindow],
    ) -> Result<Vec<f64>, SamplingError>
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Accurate => windows
                .iter()
                .map(|window| accurate::sample_rate(rng, counts, *window))
                .collect(),
            Self::Quick => match windows.first() {
                Some(first) if windows.iter().all(|w| w == first) => {
                    quick::sample_rates(rng, counts, windows.len(), *first)
                }
                _ => quick::sample_rates_windowed(rng, counts, windows),
            },
        }
    }
}

fn check_counts(counts: RateCounts) -> Result<(), SamplingError> {
    if counts.is_valid() {
        Ok(())
    } else {
        Err(SamplingError::InvalidCounts { counts })
    }
}

/// Returns the window edge to use instead of sampling, if any.
///
/// Point windows always collapse to their single rate.
fn shortcut(counts: RateCounts, window: RateWindow) -> Option<f64> {
    if window.is_point() {
        return Some(window.min());
    }
    let mle = counts.mle();
    if window.min() > mle && counts.relative_likelihood(window.min()) < SHORTCUT_LIKELIHOOD_RATIO {
        log::trace!(
            "window [{}, {}] above mode {mle} for {counts:?}; taking lower edge",
            window.min(),
            window.max()
        );
        return Some(window.min());
    }
    if window.max() < mle && counts.relative_likelihood(window.max()) < SHORTCUT_LIKELIHOOD_RATIO {
        log::trace!(
            "window [{}, {}] below mode {mle} for {counts:?}; taking upper edge",
            window.min(),
            window.max()
        );
        return Some(window.max());
    }
    None
}

/// The part of `window` that candidates are proposed from.
///
/// Falls back to the whole window when it does not overlap the range around
/// the mode; such windows are handled by [`shortcut`] first.
fn proposal_window(counts: RateCounts, window: RateWindow) -> RateWindow {
    if counts.trials == 0 {
        return window;
    }
    let (mle, reach) = (counts.mle(), PROPOSAL_SPREAD * counts.posterior_sd());
    RateWindow::new(
        window.min().max(mle - reach).max(0.0),
        window.max().min(mle + reach).min(1.0),
    )
    .unwrap_or(window)
}

/// Draws a uniform candidate in `proposal` and runs the acceptance test.
fn propose<R>(rng: &mut R, counts: RateCounts, proposal: RateWindow) -> Option<f64>
where
    R: Rng + ?Sized,
{
    let candidate = proposal.lerp(rng.random::<f64>());
    (rng.random::<f64>() < counts.relative_likelihood(candidate)).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_shortcut_above_mode() {
        let counts = RateCounts::new(2, 100);
        let window = RateWindow::at_least(0.5);
        assert_eq!(shortcut(counts, window), Some(0.5));
    }

    #[test]
    fn test_shortcut_below_mode() {
        let counts = RateCounts::new(98, 100);
        let window = RateWindow::at_most(0.5);
        assert_eq!(shortcut(counts, window), Some(0.5));
    }

    #[test]
    fn test_no_shortcut_near_mode() {
        let counts = RateCounts::new(50, 100);
        assert_eq!(shortcut(counts, RateWindow::at_least(0.52)), None);
        assert_eq!(shortcut(counts, RateWindow::FULL), None);
        assert_eq!(shortcut(RateCounts::new(0, 0), RateWindow::at_least(0.9)), None);
    }

    #[test]
    fn test_point_window() {
        let counts = RateCounts::new(5, 10);
        assert_eq!(shortcut(counts, RateWindow::at_least(1.0)), Some(1.0));
    }

    #[test]
    fn test_proposal_window_tracks_mode() {
        let counts = RateCounts::new(0, 2_000_000);
        let proposal = proposal_window(counts, RateWindow::at_least(1e-7));
        assert_eq!(proposal.min(), 1e-7);
        assert!(proposal.max() < 1e-5, "{}", proposal.max());

        // Small counts keep the whole window
        let counts = RateCounts::new(3, 5);
        assert_eq!(proposal_window(counts, RateWindow::FULL), RateWindow::FULL);
        let window = RateWindow::new(0.2, 0.4).unwrap();
        assert_eq!(proposal_window(counts, window), window);
        assert_eq!(
            proposal_window(RateCounts::new(0, 0), RateWindow::at_least(0.5)),
            RateWindow::at_least(0.5)
        );
    }

    #[test]
    fn test_large_counts_with_mode_on_window_edge() {
        let counts = RateCounts::new(0, 2_000_000);
        let window = RateWindow::at_least(1e-7);
        assert_eq!(shortcut(counts, window), None);
        for policy in [SamplingPolicy::Accurate, SamplingPolicy::Quick] {
            let mut rng = Pcg32::seed_from_u64(2);
            let draws = policy.sample(&mut rng, counts, &[window; 200]).unwrap();
            assert!(draws.iter().all(|r| (1e-7..1e-5).contains(r)));
        }
        let mut rng = Pcg32::seed_from_u64(2);
        let windows = (1..=100)
            .map(|k| RateWindow::at_least(f64::from(k) * 1e-8))
            .collect::<Vec<_>>();
        let draws = quick::sample_rates_windowed(&mut rng, counts, &windows).unwrap();
        for (draw, window) in draws.iter().zip(&windows) {
            assert!(*draw >= window.min() && *draw < 1e-5);
        }
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("quick".parse::<SamplingPolicy>().unwrap(), SamplingPolicy::Quick);
        assert_eq!(
            "accurate".parse::<SamplingPolicy>().unwrap(),
            SamplingPolicy::Accurate
        );
        assert!("fast".parse::<SamplingPolicy>().is_err());
    }

    #[test]
    fn test_policies_respect_mixed_windows() {
        let mut rng = Pcg32::seed_from_u64(7);
        let counts = RateCounts::new(12, 20);
        let windows = (0..200)
            .map(|k| RateWindow::at_least(f64::from(k % 10) / 20.0))
            .collect::<Vec<_>>();
        for policy in [SamplingPolicy::Accurate, SamplingPolicy::Quick] {
            let draws = policy.sample(&mut rng, counts, &windows).unwrap();
            assert_eq!(draws.len(), windows.len());
            for (draw, window) in draws.iter().zip(&windows) {
                assert!(*draw >= window.min() && *draw <= window.max());
            }
        }
    }

    #[test]
    fn test_invalid_counts_are_rejected() {
        let mut rng = Pcg32::seed_from_u64(1);
        let err = SamplingPolicy::Accurate
            .sample(&mut rng, RateCounts::new(3, 2), &[RateWindow::FULL])
            .unwrap_err();
        assert!(matches!(err, SamplingError::InvalidCounts { .. }));
    }
}

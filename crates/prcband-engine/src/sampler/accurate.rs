//! Exact rate sampling.
//!
//! Unconstrained draws come straight from the uniform-prior posterior
//! `Beta(i + 1, n - i + 1)`. Constrained draws use single-draw rejection
//! sampling: a uniform candidate inside the window, near enough to the mode
//! to matter, is accepted with probability equal to its likelihood relative
//! to the mode.

use rand::Rng;
use rand_distr::{Beta, Distribution as _};

use crate::rate::{RateCounts, RateWindow};

use super::SamplingError;

/// Maximum number of candidates tried for one constrained draw.
pub const MAX_ATTEMPTS: usize = 1_000_000;

/// Draws one rate for `counts` inside `window`.
///
/// # Errors
///
/// Fails with [`SamplingError::InvalidCounts`] if `successes > trials`, and
/// with [`SamplingError::NonTermination`] if no candidate is accepted within
/// [`MAX_ATTEMPTS`] tries.
///
/// # Examples
///
/// ```
/// use prcband_engine::{
///     rate::{RateCounts, RateWindow},
///     sampler::accurate,
/// };
///
/// let mut rng = rand::rng();
/// let counts = RateCounts::new(0, 10);
///
/// // Zero successes is fine: the posterior is Beta(1, 11)
/// let rate = accurate::sample_rate(&mut rng, counts, RateWindow::FULL).unwrap();
/// assert!((0.0..=1.0).contains(&rate));
///
/// // A window far above the mode collapses onto its lower edge
/// let rate = accurate::sample_rate(&mut rng, counts, RateWindow::at_least(0.8)).unwrap();
/// assert_eq!(rate, 0.8);
/// ```
pub fn sample_rate<R>(
    rng: &mut R,
    counts: RateCounts,
    window: RateWindow,
) -> Result<f64, SamplingError>
where
    R: Rng + ?Sized,
{
    super::check_counts(counts)?;

    if window.is_full() {
        return sample_posterior(rng, counts);
    }
    if let Some(edge) = super::shortcut(counts, window) {
        return Ok(edge);
    }
    let proposal = super::proposal_window(counts, window);
    for _ in 0..MAX_ATTEMPTS {
        if let Some(rate) = super::propose(rng, counts, proposal) {
            return Ok(rate);
        }
    }
    Err(SamplingError::NonTermination {
        counts,
        attempts: MAX_ATTEMPTS,
    })
}

/// Draws `count` independent rates for `counts` inside `window`.
pub fn sample_rates<R>(
    rng: &mut R,
    counts: RateCounts,
    count: usize,
    window: RateWindow,
) -> Result<Vec<f64>, SamplingError>
where
    R: Rng + ?Sized,
{
    (0..count)
        .map(|_| sample_rate(rng, counts, window))
        .collect()
}

#[expect(clippy::cast_precision_loss)]
fn sample_posterior<R>(rng: &mut R, counts: RateCounts) -> Result<f64, SamplingError>
where
    R: Rng + ?Sized,
{
    let alpha = counts.successes as f64 + 1.0;
    let beta = counts.failures() as f64 + 1.0;
    let posterior = Beta::new(alpha, beta).map_err(|_| SamplingError::InvalidCounts { counts })?;
    Ok(posterior.sample(rng))
}

#[cfg(test)]
mod tests {
    use prcband_stats::descriptive::DescriptiveStats;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_unconstrained_mean_matches_posterior() {
        let mut rng = Pcg32::seed_from_u64(42);
        let counts = RateCounts::new(30, 100);
        let draws = sample_rates(&mut rng, counts, 5000, RateWindow::FULL).unwrap();
        let stats = DescriptiveStats::new(draws).unwrap();
        // Beta(31, 71) has mean 31 / 102
        assert!((stats.mean - 31.0 / 102.0).abs() < 0.01, "{}", stats.mean);
    }

    #[test]
    fn test_constrained_draws_stay_in_window() {
        let mut rng = Pcg32::seed_from_u64(3);
        let counts = RateCounts::new(6, 10);
        let window = RateWindow::new(0.5, 0.7).unwrap();
        let draws = sample_rates(&mut rng, counts, 1000, window).unwrap();
        assert!(draws.iter().all(|r| (0.5..=0.7).contains(r)));
    }

    #[test]
    fn test_constrained_mean_matches_truncated_posterior() {
        let mut rng = Pcg32::seed_from_u64(11);
        let counts = RateCounts::new(50, 100);
        let window = RateWindow::at_least(0.5);
        let draws = sample_rates(&mut rng, counts, 4000, window).unwrap();
        let stats = DescriptiveStats::new(draws).unwrap();
        // Upper half of a posterior with sd ~0.05: mean ~0.5 + 0.05 * sqrt(2 / pi)
        assert!((stats.mean - 0.54).abs() < 0.01, "{}", stats.mean);
    }

    #[test]
    fn test_degenerate_counts_do_not_fail() {
        let mut rng = Pcg32::seed_from_u64(5);
        for counts in [
            RateCounts::new(0, 0),
            RateCounts::new(0, 25),
            RateCounts::new(25, 25),
        ] {
            for window in [
                RateWindow::FULL,
                RateWindow::at_least(0.3),
                RateWindow::at_most(0.7),
            ] {
                let rate = sample_rate(&mut rng, counts, window).unwrap();
                assert!(rate >= window.min() && rate <= window.max());
            }
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let counts = RateCounts::new(4, 9);
        let a = sample_rates(
            &mut Pcg32::seed_from_u64(9),
            counts,
            50,
            RateWindow::at_most(0.6),
        )
        .unwrap();
        let b = sample_rates(
            &mut Pcg32::seed_from_u64(9),
            counts,
            50,
            RateWindow::at_most(0.6),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}

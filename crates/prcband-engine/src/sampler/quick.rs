//! Quick-and-dirty batch rejection sampling.
//!
//! Instead of sampling each rate until it is accepted, a whole batch of
//! uniform candidates is drawn and accepted independently. If the batch comes
//! up short, a follow-up batch is sized from the observed acceptance rate to
//! cover about twice the shortfall, and rounds continue until enough rates
//! have been accepted. The result is truncated to exactly the requested
//! number of samples.

use rand::Rng;

use crate::rate::{RateCounts, RateWindow};

use super::SamplingError;

/// Upper bound on candidates drawn for a single batch request.
pub const MAX_CANDIDATES: usize = 200_000_000;

/// Upper bound on the size of one follow-up batch.
const MAX_BATCH: usize = 1 << 22;

/// Upper bound on rejection rounds for [`sample_rates_windowed`].
pub const MAX_ROUNDS: usize = 1_000_000;

/// Draws exactly `count` rates for `counts` inside a shared `window`.
///
/// # Errors
///
/// Fails with [`SamplingError::InvalidCounts`] if `successes > trials`, and
/// with [`SamplingError::NonTermination`] if more than [`MAX_CANDIDATES`]
/// candidates are needed.
///
/// # Examples
///
/// ```
/// use prcband_engine::{
///     rate::{RateCounts, RateWindow},
///     sampler::quick,
/// };
///
/// let mut rng = rand::rng();
/// let counts = RateCounts::new(45, 50);
///
/// // The window excludes the mode but still holds some mass
/// let window = RateWindow::new(0.0, 0.85).unwrap();
/// let rates = quick::sample_rates(&mut rng, counts, 1000, window).unwrap();
/// assert_eq!(rates.len(), 1000);
/// assert!(rates.iter().all(|r| *r <= 0.85));
/// ```
pub fn sample_rates<R>(
    rng: &mut R,
    counts: RateCounts,
    count: usize,
    window: RateWindow,
) -> Result<Vec<f64>, SamplingError>
where
    R: Rng + ?Sized,
{
    super::check_counts(counts)?;

    if count == 0 {
        return Ok(vec![]);
    }
    if let Some(edge) = super::shortcut(counts, window) {
        return Ok(vec![edge; count]);
    }

    let proposal = super::proposal_window(counts, window);
    let mut accepted = Vec::with_capacity(count);
    let mut drawn = 0;
    let mut batch = count.min(MAX_BATCH);
    loop {
        accepted.extend((0..batch).filter_map(|_| super::propose(rng, counts, proposal)));
        drawn += batch;

        if accepted.len() >= count {
            accepted.truncate(count);
            return Ok(accepted);
        }
        if drawn >= MAX_CANDIDATES {
            return Err(SamplingError::NonTermination {
                counts,
                attempts: drawn,
            });
        }

        let shortfall = count - accepted.len();
        batch = follow_up_batch(accepted.len(), drawn, shortfall).min(MAX_CANDIDATES - drawn);
        log::debug!("batch for {counts:?} short by {shortfall}; drawing {batch} more");
    }
}

/// Size of the next batch: about twice the candidates the observed acceptance
/// rate needs to cover `shortfall`, at least `shortfall`, at most
/// [`MAX_BATCH`].
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
fn follow_up_batch(accepted: usize, drawn: usize, shortfall: usize) -> usize {
    let acceptance = (accepted as f64 / drawn as f64).max(1.0 / drawn as f64);
    ((2.0 * shortfall as f64 / acceptance).ceil() as usize)
        .max(shortfall)
        .min(MAX_BATCH)
}

/// Draws one rate per window, each inside its own window.
///
/// Every round proposes one candidate for each slot that is still unfilled,
/// so the work per round shrinks as slots are accepted. Slots whose window
/// triggers the edge shortcut are filled up front.
///
/// # Errors
///
/// Fails with [`SamplingError::InvalidCounts`] if `successes > trials`, and
/// with [`SamplingError::NonTermination`] if some slot is still unfilled after
/// [`MAX_ROUNDS`] rounds.
pub fn sample_rates_windowed<R>(
    rng: &mut R,
    counts: RateCounts,
    windows: &[RateWindow],
) -> Result<Vec<f64>, SamplingError>
where
    R: Rng + ?Sized,
{
    super::check_counts(counts)?;

    let mut rates = vec![f64::NAN; windows.len()];
    let mut pending = vec![];
    for (slot, window) in windows.iter().enumerate() {
        match super::shortcut(counts, *window) {
            Some(edge) => rates[slot] = edge,
            None => pending.push(slot),
        }
    }

    let proposals = windows
        .iter()
        .map(|window| super::proposal_window(counts, *window))
        .collect::<Vec<_>>();
    let mut rounds = 0;
    while !pending.is_empty() {
        if rounds == MAX_ROUNDS {
            return Err(SamplingError::NonTermination {
                counts,
                attempts: rounds,
            });
        }
        pending.retain(|&slot| match super::propose(rng, counts, proposals[slot]) {
            Some(rate) => {
                rates[slot] = rate;
                false
            }
            None => true,
        });
        rounds += 1;
    }
    Ok(rates)
}

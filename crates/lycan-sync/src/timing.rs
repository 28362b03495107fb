//! Timeout and jitter helpers.

use std::future::Future;
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

/// Runs `fut` for at most `limit`.
///
/// Returns `None` when the deadline passes first; the future is dropped,
/// which cancels whatever it was waiting on. Expiry is a normal outcome
/// (the caller falls back to a default), so it is logged at debug level.
pub async fn bounded<F: Future>(
    label: &str,
    limit: Duration,
    fut: F,
) -> Option<F::Output> {
    match tokio::time::timeout(limit, fut).await {
        Ok(output) => Some(output),
        Err(_) => {
            tracing::debug!(
                label,
                limit_secs = limit.as_secs_f64(),
                "interaction timed out"
            );
            None
        }
    }
}

/// Picks a uniformly random duration in `range` (whole milliseconds).
pub fn random_delay(range: RangeInclusive<Duration>) -> Duration {
    let lo = range.start().as_millis() as u64;
    let hi = range.end().as_millis() as u64;
    if hi <= lo {
        return Duration::from_millis(lo);
    }
    Duration::from_millis(rand::rng().random_range(lo..=hi))
}

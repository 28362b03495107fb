//! Rolling-window rate limiter.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// Admits at most `limit` events in any rolling `window`.
///
/// Only admitted events occupy the window; rejected ones are free. Uses
/// the Tokio clock so paused-time tests can drive it.
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    admitted: VecDeque<Instant>,
}

impl RateLimiter {
    /// Creates a limiter. A `limit` of zero rejects everything.
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            admitted: VecDeque::with_capacity(limit),
        }
    }

    /// Tries to admit one event now.
    pub fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        while let Some(oldest) = self.admitted.front() {
            if now.duration_since(*oldest) >= self.window {
                self.admitted.pop_front();
            } else {
                break;
            }
        }

        if self.admitted.len() < self.limit {
            self.admitted.push_back(now);
            true
        } else {
            false
        }
    }

    /// Events currently counted against the window (may include expired
    /// entries until the next [`try_acquire`](Self::try_acquire)).
    pub fn in_window(&self) -> usize {
        self.admitted.len()
    }
}

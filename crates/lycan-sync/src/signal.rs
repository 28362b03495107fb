//! Single-fire event.

use tokio::sync::watch;

/// A one-way latch: starts unset, can be set once, never unset.
///
/// Any number of tasks can [`wait`](Self::wait) on it. Waiting after the
/// signal was set returns immediately, so there is no lost-wakeup race
/// between checking and waiting.
#[derive(Debug)]
pub struct Signal {
    tx: watch::Sender<bool>,
}

impl Signal {
    /// Creates an unset signal.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Sets the signal. Returns `true` only for the call that actually
    /// flipped it.
    pub fn set(&self) -> bool {
        !self.tx.send_replace(true)
    }

    /// Returns `true` once the signal has been set.
    pub fn is_set(&self) -> bool {
        *self.tx.borrow()
    }

    /// Waits until the signal is set.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while
        // we hold `&self`.
        let _ = rx.wait_for(|set| *set).await;
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

//! Countdown barrier.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Signal;

/// Fires once a fixed number of participants have arrived.
///
/// The engine creates one per night sized to the number of living
/// werewolves. Each werewolf turn holds a [`Ticket`]; when the turn ends
/// (normally, by timeout, or by cancellation) the ticket drops and
/// counts down. The witch waits on [`CompletionBarrier::wait`].
#[derive(Debug)]
pub struct CompletionBarrier {
    remaining: AtomicUsize,
    done: Signal,
}

impl CompletionBarrier {
    /// Creates a barrier expecting `participants` arrivals.
    /// A barrier with zero participants is already complete.
    pub fn new(participants: usize) -> Self {
        let done = Signal::new();
        if participants == 0 {
            done.set();
        }
        Self {
            remaining: AtomicUsize::new(participants),
            done,
        }
    }

    /// Hands out a ticket that arrives when dropped.
    pub fn ticket(&self) -> Ticket<'_> {
        Ticket { barrier: self }
    }

    /// Records one arrival. Extra arrivals beyond the expected count are
    /// ignored.
    pub fn arrive(&self) {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                n.checked_sub(1)
            });
        if previous == Ok(1) {
            tracing::trace!("completion barrier released");
            self.done.set();
        }
    }

    /// How many arrivals are still outstanding.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Returns `true` once every participant has arrived.
    pub fn is_complete(&self) -> bool {
        self.done.is_set()
    }

    /// Waits until every participant has arrived.
    pub async fn wait(&self) {
        self.done.wait().await;
    }
}

/// An outstanding arrival. Counts down its barrier on drop.
#[derive(Debug)]
#[must_use = "dropping a ticket immediately counts as arriving"]
pub struct Ticket<'a> {
    barrier: &'a CompletionBarrier,
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        self.barrier.arrive();
    }
}

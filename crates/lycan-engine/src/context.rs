//! Per-round shared state.

use std::collections::BTreeSet;
use std::sync::Arc;

use lycan_sync::CompletionBarrier;

use crate::PlayerIndex;

/// State shared by every interaction of the current round.
///
/// Everything except `day` is wiped at night start by
/// [`RoundContext::begin_night`].
#[derive(Debug)]
pub(crate) struct RoundContext {
    pub(crate) day: u32,
    /// `None` until resolved, then the (possibly empty) werewolf target.
    /// Resolved at most once per night.
    pub(crate) wolf_target: Option<Option<PlayerIndex>>,
    pub(crate) protected: BTreeSet<PlayerIndex>,
    pub(crate) antidote: BTreeSet<PlayerIndex>,
    /// Witches who used poison this night.
    pub(crate) poisoners: BTreeSet<PlayerIndex>,
    /// The player currently taking someone with them.
    pub(crate) shooter: Option<PlayerIndex>,
    /// Released when every werewolf turn of the night has ended.
    pub(crate) wolves_done: Arc<CompletionBarrier>,
}

impl RoundContext {
    pub(crate) fn new() -> Self {
        Self {
            day: 0,
            wolf_target: None,
            protected: BTreeSet::new(),
            antidote: BTreeSet::new(),
            poisoners: BTreeSet::new(),
            shooter: None,
            wolves_done: Arc::new(CompletionBarrier::new(0)),
        }
    }

    /// Clears the night's fields and arms a fresh werewolf barrier.
    pub(crate) fn begin_night(&mut self, wolves: usize) -> Arc<CompletionBarrier> {
        self.wolf_target = None;
        self.protected.clear();
        self.antidote.clear();
        self.poisoners.clear();
        self.shooter = None;
        self.wolves_done = Arc::new(CompletionBarrier::new(wolves));
        Arc::clone(&self.wolves_done)
    }
}

//! The public game handle.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lycan_protocol::{GroupId, UserId};
use lycan_sync::Signal;
use lycan_transport::{ChatTransport, InputStore};
use rand::seq::SliceRandom;

use crate::dead_channel::DeadChannel;
use crate::engine::Engine;
use crate::{
    DeathRecord, GameConfig, GameError, GameStatus, Player, PlayerIndex, PlayerSnapshot, Role,
    deal_roles,
};

/// One game of Werewolf in one group.
///
/// Build with [`Game::new`] (roles dealt from the config) or
/// [`Game::with_roles`] (roles fixed by the caller), then drive it with
/// [`Game::run`]. [`Game::terminate`] may be called from anywhere while
/// it runs.
///
/// ```ignore
/// let game = Arc::new(Game::new(group, roster, GameConfig::default(), transport, inputs)?);
/// let handle = Arc::clone(&game);
/// tokio::spawn(async move { handle.run().await });
/// // later
/// game.terminate();
/// ```
pub struct Game {
    engine: Engine,
    terminate: Signal,
    started: AtomicBool,
}

impl Game {
    /// Deals roles for `roster` (user id, display name) and builds the game.
    pub fn new(
        group: GroupId,
        roster: impl IntoIterator<Item = (UserId, String)>,
        config: GameConfig,
        transport: Arc<dyn ChatTransport>,
        inputs: Arc<InputStore>,
    ) -> Result<Self, GameError> {
        let config = config.validated()?;
        let roster: Vec<(UserId, String)> = roster.into_iter().collect();
        let roles = deal_roles(&config, roster.len(), &mut rand::rng())?;
        let seats = roster
            .into_iter()
            .zip(roles)
            .map(|((user_id, name), role)| (user_id, name, role));
        Self::with_roles(group, seats, config, transport, inputs)
    }

    /// Builds a game whose roles the caller already decided.
    ///
    /// The seat count does not have to match a preset.
    pub fn with_roles(
        group: GroupId,
        seats: impl IntoIterator<Item = (UserId, String, Role)>,
        config: GameConfig,
        transport: Arc<dyn ChatTransport>,
        inputs: Arc<InputStore>,
    ) -> Result<Self, GameError> {
        let config = config.validated()?;
        let mut seen = BTreeSet::new();
        let mut players = Vec::new();
        for (i, (user_id, name, role)) in seats.into_iter().enumerate() {
            if !seen.insert(user_id.clone()) {
                return Err(GameError::DuplicatePlayer(user_id));
            }
            players.push(Player::new(PlayerIndex(i), user_id, name, role));
        }

        let mut speaking_order: Vec<PlayerIndex> = players.iter().map(Player::index).collect();
        speaking_order.shuffle(&mut rand::rng());

        tracing::debug!(%group, players = players.len(), "game created");
        Ok(Self {
            engine: Engine::new(group, config, transport, inputs, players, speaking_order),
            terminate: Signal::new(),
            started: AtomicBool::new(false),
        })
    }

    pub fn group(&self) -> &GroupId {
        &self.engine.group
    }

    /// Plays the game to completion.
    ///
    /// Returns the winner, or [`GameError::Terminated`] if
    /// [`terminate`](Self::terminate) was called first. A game runs
    /// once; a second call fails with [`GameError::AlreadyStarted`].
    pub async fn run(&self) -> Result<GameStatus, GameError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(GameError::AlreadyStarted);
        }
        let engine = &self.engine;
        tracing::info!(group = %engine.group, players = engine.all().len(), "game started");

        // However run ends (win, error, termination, or the future being
        // dropped), the dead channel must stop.
        let _finished = FinishGuard(&engine.finished);

        let session = async {
            let play = async {
                let outcome = engine.play().await;
                engine.finished.set();
                outcome
            };
            let (outcome, ()) = tokio::join!(play, DeadChannel::new(engine).run());
            outcome
        };

        let outcome = tokio::select! {
            outcome = session => outcome,
            () = self.terminate.wait() => Err(GameError::Terminated),
        };

        match &outcome {
            Ok(status) => tracing::info!(group = %engine.group, %status, "game over"),
            Err(GameError::Terminated) => tracing::warn!(group = %engine.group, "game terminated"),
            Err(err) => tracing::warn!(group = %engine.group, error = %err, "game aborted"),
        }
        outcome
    }

    /// Asks a running game to stop. No result is announced.
    pub fn terminate(&self) {
        if self.terminate.set() {
            tracing::info!(group = %self.engine.group, "termination requested");
        }
    }

    /// `true` once [`run`](Self::run) has returned or been dropped.
    pub fn is_finished(&self) -> bool {
        self.engine.finished.is_set()
    }

    /// Every player, ordered by user id.
    pub fn players(&self) -> Vec<PlayerSnapshot> {
        self.engine.all().iter().map(Player::snapshot).collect()
    }

    /// Deaths so far, in the order they were processed.
    pub fn death_report(&self) -> Vec<DeathRecord> {
        self.engine.death_report()
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("group", &self.engine.group)
            .field("players", &self.engine.all().len())
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Fires the finished signal on drop.
struct FinishGuard<'a>(&'a Signal);

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.0.set();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lycan_transport::MemoryTransport;

    #[test]
    fn test_with_roles_speaking_order_covers_every_seat_once() {
        let (transport, _outbox) = MemoryTransport::new();
        let seats = (1..=8).map(|i| {
            let role = if i <= 2 { Role::Werewolf } else { Role::Civilian };
            (UserId::from(format!("u{i}")), format!("P{i}"), role)
        });
        let game = Game::with_roles(
            GroupId::from("g"),
            seats,
            GameConfig::default(),
            Arc::new(transport),
            Arc::new(InputStore::new()),
        )
        .unwrap();

        let mut order = game.engine.speaking_order.clone();
        order.sort();
        let expected: Vec<PlayerIndex> = (0..8).map(PlayerIndex).collect();
        assert_eq!(order, expected);
    }
}

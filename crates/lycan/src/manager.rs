//! Per-group game registry.
//!
//! A host owns one [`GameManager`]. It starts at most one game per group,
//! spawns a supervisor task for each, and forgets the game once its run
//! ends, however it ends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lycan_engine::{Game, GameConfig, GameError, GameStatus, PlayerSnapshot};
use lycan_protocol::{GroupId, Target, UserId};
use lycan_transport::{ChatTransport, InputStore};
use tokio::task::JoinHandle;

use crate::{LycanError, ManagerError};

/// Posted to the group when a game dies on an unexpected error.
pub const INTERNAL_ERROR_MESSAGE: &str = "The game stopped because of an internal error.";

type Registry = Arc<Mutex<HashMap<GroupId, Arc<Game>>>>;

/// Starts, tracks and stops games, one per group.
pub struct GameManager {
    transport: Arc<dyn ChatTransport>,
    inputs: Arc<InputStore>,
    config: GameConfig,
    games: Registry,
}

impl GameManager {
    /// Creates a manager whose games share `transport`, `inputs` and
    /// `config`.
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        inputs: Arc<InputStore>,
        config: GameConfig,
    ) -> Self {
        Self {
            transport,
            inputs,
            config,
            games: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The store the host's inbound path should feed.
    pub fn inputs(&self) -> &Arc<InputStore> {
        &self.inputs
    }

    /// Routes one incoming text to whichever game is waiting for it.
    ///
    /// Returns `false` when nobody was waiting and the text was dropped.
    pub fn deliver(&self, user: &UserId, scope: Option<&GroupId>, text: impl Into<String>) -> bool {
        self.inputs.put(user, scope, text)
    }

    /// Deals roles for `roster` and starts a game in `group`.
    ///
    /// The game runs on a spawned task, so this must be called from
    /// inside a Tokio runtime. The returned handle yields the game's
    /// result; by the time it resolves the group is free again.
    pub fn start(
        &self,
        group: GroupId,
        roster: impl IntoIterator<Item = (UserId, String)>,
    ) -> Result<JoinHandle<Result<GameStatus, GameError>>, LycanError> {
        let game = {
            let mut games = lock(&self.games);
            if games.contains_key(&group) {
                return Err(ManagerError::AlreadyRunning(group).into());
            }
            let game = Arc::new(Game::new(
                group.clone(),
                roster,
                self.config.clone(),
                Arc::clone(&self.transport),
                Arc::clone(&self.inputs),
            )?);
            games.insert(group, Arc::clone(&game));
            game
        };

        // Created outside the task so an abort before the first poll still
        // unregisters the game.
        let registration = Registration {
            games: Arc::clone(&self.games),
            game: Arc::clone(&game),
        };
        let transport = Arc::clone(&self.transport);
        Ok(tokio::spawn(supervise(game, registration, transport)))
    }

    /// Asks the game in `group` to stop. It is unregistered once its
    /// task has wound down.
    pub fn terminate(&self, group: &GroupId) -> Result<(), ManagerError> {
        let game = lock(&self.games)
            .get(group)
            .cloned()
            .ok_or_else(|| ManagerError::NotRunning(group.clone()))?;
        game.terminate();
        Ok(())
    }

    pub fn is_running(&self, group: &GroupId) -> bool {
        lock(&self.games).contains_key(group)
    }

    /// Groups with a game in progress, sorted.
    pub fn running_groups(&self) -> Vec<GroupId> {
        let mut groups: Vec<GroupId> = lock(&self.games).keys().cloned().collect();
        groups.sort();
        groups
    }

    /// Snapshot of the players in `group`'s game.
    pub fn players_of(&self, group: &GroupId) -> Result<Vec<PlayerSnapshot>, ManagerError> {
        lock(&self.games)
            .get(group)
            .map(|game| game.players())
            .ok_or_else(|| ManagerError::NotRunning(group.clone()))
    }
}

impl std::fmt::Debug for GameManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameManager")
            .field("running", &self.running_groups())
            .finish()
    }
}

async fn supervise(
    game: Arc<Game>,
    registration: Registration,
    transport: Arc<dyn ChatTransport>,
) -> Result<GameStatus, GameError> {
    let group = game.group().clone();
    let outcome = game.run().await;

    match &outcome {
        Ok(status) => tracing::info!(%group, %status, "game finished"),
        Err(GameError::Terminated) => tracing::warn!(%group, "game terminated by host"),
        Err(err) => {
            tracing::error!(%group, error = %err, "game failed");
            let target = Target::Group(group.clone());
            if let Err(send_err) = transport.send_text(&target, INTERNAL_ERROR_MESSAGE).await {
                tracing::warn!(%group, error = %send_err, "could not report failure to group");
            }
        }
    }

    drop(registration);
    outcome
}

/// Removes a game from the registry on drop: when its supervisor returns,
/// panics, or is aborted.
struct Registration {
    games: Registry,
    game: Arc<Game>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let group = self.game.group();
        let mut registry = lock(&self.games);
        if registry
            .get(group)
            .is_some_and(|current| Arc::ptr_eq(current, &self.game))
        {
            registry.remove(group);
            tracing::debug!(%group, "game unregistered");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

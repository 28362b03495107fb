//! Role behavior.
//!
//! Each [`Role`] maps to one stateless strategy object through
//! [`strategy_for`]. Strategies get a [`Turn`] (the engine plus the
//! acting player) and keep any memory on the player itself.

mod guard;
mod idiot;
mod prophet;
mod shooter;
mod villager;
mod werewolf;
mod witch;

use std::time::Duration;

use async_trait::async_trait;
use lycan_protocol::Intent;

use crate::engine::Engine;
use crate::{GameError, GameStatus, KillReason, Player, PlayerIndex, PlayerSet, Role, Timeouts};

/// What a role decides when someone tries to kill it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KillVerdict {
    Die,
    /// The kill does not happen.
    Spare,
    /// The player dies and the game ends at once.
    DieAndWin(GameStatus),
}

// ---------------------------------------------------------------------------
// Turn
// ---------------------------------------------------------------------------

/// One player acting inside the engine.
#[derive(Clone, Copy)]
pub(crate) struct Turn<'a> {
    pub(crate) engine: &'a Engine,
    pub(crate) me: &'a Player,
}

impl<'a> Turn<'a> {
    pub(crate) fn new(engine: &'a Engine, me: &'a Player) -> Self {
        Self { engine, me }
    }

    /// Living players, in prompt order.
    pub(crate) fn alive(&self) -> PlayerSet<'a> {
        self.engine.all().alive()
    }

    pub(crate) async fn send(&self, text: &str) -> Result<(), GameError> {
        self.engine.tell(self.me, text).await
    }

    pub(crate) async fn receive(&self) -> Result<String, GameError> {
        self.engine.receive_private(self.me).await
    }

    /// Reads private replies until one picks an entry of `candidates`.
    ///
    /// With `allow_stop`, `/stop` returns `None`. Anything else gets a
    /// hint and another read.
    pub(crate) async fn choose<'p>(
        &self,
        candidates: &PlayerSet<'p>,
        allow_stop: bool,
    ) -> Result<Option<&'p Player>, GameError> {
        loop {
            let text = self.receive().await?;
            let intent = Intent::parse(&text);
            if allow_stop && intent.is_stop() {
                return Ok(None);
            }
            let picked = intent
                .position_in(candidates.len())
                .and_then(|pos| candidates.get(pos));
            if let Some(player) = picked {
                return Ok(Some(player));
            }
            let hint = if allow_stop {
                format!("Reply with a number from 1 to {}, or /stop.", candidates.len())
            } else {
                format!("Reply with a number from 1 to {}.", candidates.len())
            };
            self.send(&hint).await?;
        }
    }
}

// ---------------------------------------------------------------------------
// RoleStrategy
// ---------------------------------------------------------------------------

/// The per-role protocol. Default methods describe a role with no
/// special ability.
#[async_trait]
pub(crate) trait RoleStrategy: Send + Sync {
    /// Rules text sent with the role at game start.
    fn briefing(&self) -> &'static str;

    /// Tells the player their role.
    async fn notify(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        let text = format!("Your role: {}.\n{}", turn.me.role(), self.briefing());
        turn.send(&text).await
    }

    /// Runs before the night turn, outside its timeout.
    async fn before_night(&self, _turn: &Turn<'_>) -> Result<(), GameError> {
        Ok(())
    }

    /// Time limit for [`RoleStrategy::interact`].
    fn night_timeout(&self, timeouts: &Timeouts) -> Duration {
        timeouts.interact()
    }

    /// The night turn.
    async fn interact(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        turn.send("You have no night action. Keep your eyes closed until morning.")
            .await
    }

    /// Decides what happens when this player is about to die.
    async fn on_kill(&self, _turn: &Turn<'_>, _reason: KillReason) -> Result<KillVerdict, GameError> {
        Ok(KillVerdict::Die)
    }

    /// Runs once after the player died. Returns someone to take along.
    async fn post_kill(&self, _turn: &Turn<'_>) -> Result<Option<PlayerIndex>, GameError> {
        Ok(None)
    }

    /// Casts a ballot among `candidates`. `None` abstains.
    async fn vote(
        &self,
        turn: &Turn<'_>,
        candidates: &PlayerSet<'_>,
    ) -> Result<Option<PlayerIndex>, GameError> {
        cast_ballot(turn, candidates).await
    }
}

/// Prompts for a vote and reads it.
pub(crate) async fn cast_ballot(
    turn: &Turn<'_>,
    candidates: &PlayerSet<'_>,
) -> Result<Option<PlayerIndex>, GameError> {
    turn.send(&format!(
        "Vote for a player to eliminate, or send /stop to abstain:\n{}",
        candidates.show()
    ))
    .await?;
    let pick = turn.choose(candidates, true).await?;
    match pick {
        Some(player) => turn.send(&format!("You voted for {player}.")).await?,
        None => turn.send("You abstained.").await?,
    }
    Ok(pick.map(Player::index))
}

/// The strategy for `role`.
pub(crate) fn strategy_for(role: Role) -> &'static dyn RoleStrategy {
    match role {
        Role::Werewolf => &werewolf::Werewolf,
        Role::WolfKing => &werewolf::WolfKing,
        Role::Prophet => &prophet::Prophet,
        Role::Witch => &witch::Witch,
        Role::Hunter => &shooter::Hunter,
        Role::Guard => &guard::Guard,
        Role::Idiot => &idiot::Idiot,
        Role::Civilian => &villager::Civilian,
        Role::Jester => &villager::Jester,
    }
}

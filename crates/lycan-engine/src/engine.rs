//! The engine core: the player arena, messaging helpers, and the kill
//! pipeline shared by every phase.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::future::try_join_all;
use lycan_protocol::{GroupId, Intent, Target};
use lycan_sync::{CompletionBarrier, bounded};
use lycan_transport::{ChatTransport, InputStore};
use rand::seq::IndexedRandom;

use crate::context::RoundContext;
use crate::error::{Halt, Step};
use crate::outcome::check_status;
use crate::roles::{KillVerdict, Turn, strategy_for};
use crate::{
    DeathRecord, Faction, GameConfig, GameError, KillInfo, KillReason, Player, PlayerIndex,
    PlayerSet, WolfConsensus,
};

/// Shared state of one running game.
///
/// Owned by [`Game`](crate::Game). Phases are `impl Engine` blocks in
/// `phases/`; role behavior reaches the engine through a [`Turn`].
pub(crate) struct Engine {
    pub(crate) group: GroupId,
    pub(crate) config: GameConfig,
    transport: Arc<dyn ChatTransport>,
    inputs: Arc<InputStore>,
    players: Vec<Player>,
    round: Mutex<RoundContext>,
    /// Indices in the order their deaths were fully processed.
    report: Mutex<Vec<PlayerIndex>>,
    /// Turn-based discussion order, shuffled once per game.
    pub(crate) speaking_order: Vec<PlayerIndex>,
    /// Fires when the round loop has stopped for any reason.
    pub(crate) finished: lycan_sync::Signal,
}

impl Engine {
    pub(crate) fn new(
        group: GroupId,
        config: GameConfig,
        transport: Arc<dyn ChatTransport>,
        inputs: Arc<InputStore>,
        players: Vec<Player>,
        speaking_order: Vec<PlayerIndex>,
    ) -> Self {
        Self {
            group,
            config,
            transport,
            inputs,
            players,
            round: Mutex::new(RoundContext::new()),
            report: Mutex::new(Vec::new()),
            speaking_order,
            finished: lycan_sync::Signal::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Arena access
    // -----------------------------------------------------------------------

    /// Every player, dead or alive.
    pub(crate) fn all(&self) -> PlayerSet<'_> {
        PlayerSet::new(&self.players)
    }

    pub(crate) fn player(&self, index: PlayerIndex) -> &Player {
        &self.players[index.0]
    }

    pub(crate) fn round(&self) -> MutexGuard<'_, RoundContext> {
        lock(&self.round)
    }

    pub(crate) fn transport(&self) -> &dyn ChatTransport {
        self.transport.as_ref()
    }

    /// The barrier the witch waits on tonight.
    pub(crate) fn wolf_barrier(&self) -> Arc<CompletionBarrier> {
        Arc::clone(&self.round().wolves_done)
    }

    // -----------------------------------------------------------------------
    // Messaging
    // -----------------------------------------------------------------------

    /// Posts to the game's group.
    pub(crate) async fn announce(&self, text: &str) -> Result<(), GameError> {
        let target = Target::Group(self.group.clone());
        self.transport.send_text(&target, text).await?;
        Ok(())
    }

    /// Messages one player privately.
    pub(crate) async fn tell(&self, player: &Player, text: &str) -> Result<(), GameError> {
        self.transport.send_text(&player.target(), text).await?;
        Ok(())
    }

    /// Messages every member of `set` privately.
    pub(crate) async fn tell_all(&self, set: &PlayerSet<'_>, text: &str) -> Result<(), GameError> {
        set.broadcast(self.transport(), text).await?;
        Ok(())
    }

    /// Next private message from `player`.
    pub(crate) async fn receive_private(&self, player: &Player) -> Result<String, GameError> {
        Ok(self.inputs.fetch(player.user_id(), None).await?)
    }

    /// Next message `player` posts in the game's group.
    pub(crate) async fn receive_group(&self, player: &Player) -> Result<String, GameError> {
        Ok(self.inputs.fetch(player.user_id(), Some(&self.group)).await?)
    }

    /// Waits until every member of `speakers` has sent `/stop` in the
    /// group, or `limit` passes.
    pub(crate) async fn wait_for_stop(
        &self,
        speakers: &PlayerSet<'_>,
        limit: Duration,
        label: &str,
    ) -> Result<(), GameError> {
        let waits = speakers.iter().map(|speaker| async move {
            loop {
                let text = self.receive_group(speaker).await?;
                if Intent::parse(&text).is_stop() {
                    return Ok::<_, GameError>(());
                }
            }
        });
        match bounded(label, limit, try_join_all(waits)).await {
            Some(done) => done.map(|_| ()),
            None => Ok(()),
        }
    }

    /// A last-words window for `player`, ended by `/stop` or the eulogy
    /// timeout.
    pub(crate) async fn last_words(&self, player: &Player) -> Result<(), GameError> {
        let speaker = PlayerSet::new([player]);
        self.wait_for_stop(&speaker, self.config.timeouts.eulogy(), "last words")
            .await
    }

    // -----------------------------------------------------------------------
    // Night target
    // -----------------------------------------------------------------------

    /// Settles tonight's werewolf target. The first call decides; later
    /// calls in the same night return the same answer.
    pub(crate) fn resolve_wolf_target(&self) -> Option<PlayerIndex> {
        if let Some(resolved) = self.round().wolf_target {
            return resolved;
        }
        let picks = self.all().alive().select(Faction::Werewolf).selections();
        let choice = match picks.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => match self.config.wolf_consensus {
                WolfConsensus::NoKill => None,
                WolfConsensus::RandomPick => picks.choose(&mut rand::rng()).copied(),
            },
        };
        let mut round = self.round();
        *round.wolf_target.get_or_insert(choice)
    }

    // -----------------------------------------------------------------------
    // Kills
    // -----------------------------------------------------------------------

    /// Kills `index` unless they are already dead or their role spares
    /// them. Returns the stored [`KillInfo`] when the player died.
    ///
    /// A role may end the game on its own death; that surfaces as
    /// `Err(Halt::Finished(..))`.
    pub(crate) async fn kill(
        &self,
        index: PlayerIndex,
        reason: KillReason,
        killers: &[PlayerIndex],
    ) -> Step<Option<KillInfo>> {
        let target = self.player(index);
        if !target.is_alive() {
            return Ok(None);
        }

        let turn = Turn::new(self, target);
        let verdict = strategy_for(target.role()).on_kill(&turn, reason).await?;
        let info = KillInfo {
            reason,
            killers: killers
                .iter()
                .map(|&k| self.player(k).name().to_owned())
                .collect(),
        };

        match verdict {
            KillVerdict::Spare => {
                tracing::info!(
                    group = %self.group,
                    player = %target.user_id(),
                    ?reason,
                    "kill prevented by role"
                );
                Ok(None)
            }
            KillVerdict::Die => {
                if !target.mark_dead(info.clone()) {
                    return Ok(None);
                }
                tracing::info!(
                    group = %self.group,
                    player = %target.user_id(),
                    role = %target.role(),
                    ?reason,
                    "player killed"
                );
                Ok(Some(info))
            }
            KillVerdict::DieAndWin(status) => {
                target.mark_dead(info);
                self.record_death(index);
                tracing::info!(
                    group = %self.group,
                    player = %target.user_id(),
                    %status,
                    "death ends the game"
                );
                Err(Halt::Finished(status))
            }
        }
    }

    /// Runs post-death effects for each player in `dead`, depth first:
    /// a shot victim is fully processed before the next original death.
    ///
    /// Every processed player departs (joins the dead channel) and is
    /// appended to the death report.
    pub(crate) async fn post_kill(&self, dead: Vec<PlayerIndex>) -> Step<()> {
        let mut pending: Vec<PlayerIndex> = dead.into_iter().rev().collect();
        while let Some(index) = pending.pop() {
            let player = self.player(index);
            if player.role().can_shoot() {
                self.round().shooter = Some(index);
            }
            let turn = Turn::new(self, player);
            let shot = strategy_for(player.role()).post_kill(&turn).await;
            let shooter = self.round().shooter.take();
            let shot = shot?;

            self.record_death(index);
            player.departed().set();

            let (Some(victim), Some(shooter)) = (shot, shooter) else {
                continue;
            };
            if self.kill(victim, KillReason::Shoot, &[shooter]).await?.is_none() {
                continue;
            }
            let (shooter, victim) = (self.player(shooter), self.player(victim));
            self.announce(&format!(
                "{shooter} fired a shot before dying. {victim} is dead. \
                 {victim}, you may say your last words; send /stop when you are done."
            ))
            .await?;
            self.last_words(victim).await?;
            pending.push(victim.index());
        }
        Ok(())
    }

    fn record_death(&self, index: PlayerIndex) {
        let mut report = lock(&self.report);
        if !report.contains(&index) {
            report.push(index);
        }
    }

    /// Deaths in the order they were processed.
    pub(crate) fn death_report(&self) -> Vec<DeathRecord> {
        lock(&self.report)
            .iter()
            .filter_map(|&index| {
                let player = self.player(index);
                player.kill_info().map(|kill_info| DeathRecord {
                    user_id: player.user_id().clone(),
                    name: player.name().to_owned(),
                    role: player.role(),
                    kill_info,
                })
            })
            .collect()
    }

    /// Stops the round loop if a side has won.
    pub(crate) fn check(&self) -> Step<()> {
        match check_status(&self.all()) {
            Some(status) => Err(Halt::Finished(status)),
            None => Ok(()),
        }
    }
}

/// Locks a mutex, ignoring poisoning: the data is plain game state and
/// stays consistent between statements.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

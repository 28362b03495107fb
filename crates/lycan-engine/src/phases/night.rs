//! The night: every living player's turn runs concurrently, then the
//! results apply together.

use futures_util::future::try_join_all;
use lycan_sync::{CompletionBarrier, bounded, random_delay};

use crate::engine::Engine;
use crate::error::Step;
use crate::roles::{Turn, strategy_for};
use crate::{Faction, GameError, KillReason, Player, PlayerIndex, PlayerSet, Role};

impl Engine {
    /// Runs the night and returns who died, in resolution order.
    pub(crate) async fn night(&self) -> Step<Vec<PlayerIndex>> {
        let alive = self.all().alive();
        let wolves = alive.select(Faction::Werewolf);
        for player in alive.iter() {
            player.set_selected(None);
        }
        let barrier = self.round().begin_night(wolves.len());
        let night = self.round().day + 1;
        tracing::info!(group = %self.group, night, alive = alive.len(), "night falls");

        self.announce(
            "Night falls. Everyone close your eyes. Players with a night role, \
             check your private messages.",
        )
        .await?;

        let witch_alive = !alive.select(Role::Witch).is_empty();
        let turns = try_join_all(alive.iter().map(|player| self.night_turn(player, &barrier)));
        let padding = async {
            // Without the padding a quick night would reveal the witch is dead.
            if !witch_alive {
                tokio::time::sleep(random_delay(self.config.witch_absence_delay())).await;
            }
        };
        let (turns, ()) = tokio::join!(turns, padding);
        turns?;

        let target = self.resolve_wolf_target();
        self.tell_pack(&wolves, target).await?;
        self.apply_night(target).await
    }

    /// One player's night: the optional pre-turn wait, then the
    /// interaction under its time limit.
    async fn night_turn(&self, player: &Player, barrier: &CompletionBarrier) -> Result<(), GameError> {
        let strategy = strategy_for(player.role());
        let turn = Turn::new(self, player);
        let _ticket = (player.faction() == Faction::Werewolf).then(|| barrier.ticket());

        strategy.before_night(&turn).await?;
        let limit = strategy.night_timeout(&self.config.timeouts);
        match bounded("night turn", limit, strategy.interact(&turn)).await {
            Some(result) => result,
            None => turn.send("Time is up; your night turn is over.").await,
        }
    }

    async fn tell_pack(&self, wolves: &PlayerSet<'_>, target: Option<PlayerIndex>) -> Result<(), GameError> {
        let text = match target {
            Some(index) => format!("The pack goes after {} tonight.", self.player(index)),
            None => "The pack did not settle on a victim. Nobody is attacked tonight.".to_owned(),
        };
        self.tell_all(wolves, &text).await
    }

    /// Applies the night's kills: the werewolf attack unless protected or
    /// saved, then every poison unless protected.
    async fn apply_night(&self, target: Option<PlayerIndex>) -> Step<Vec<PlayerIndex>> {
        let (protected, antidote, poisoners) = {
            let round = self.round();
            (
                round.protected.clone(),
                round.antidote.clone(),
                round.poisoners.clone(),
            )
        };
        let wolves = self.all().alive().select(Faction::Werewolf).indices();
        let mut dead = Vec::new();

        if let Some(target) = target {
            if protected.contains(&target) || antidote.contains(&target) {
                tracing::info!(group = %self.group, player = %self.player(target).user_id(), "werewolf attack prevented");
            } else if self.kill(target, KillReason::Werewolf, &wolves).await?.is_some() {
                dead.push(target);
            }
        }

        for witch in poisoners {
            let Some(victim) = self.player(witch).selected() else {
                continue;
            };
            if protected.contains(&victim) {
                tracing::info!(group = %self.group, player = %self.player(victim).user_id(), "poison blocked by protection");
            } else if self.kill(victim, KillReason::Poison, &[witch]).await?.is_some() {
                dead.push(victim);
            }
        }
        Ok(dead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::table;

    // Seats: P1 wolf, P2 guard, P3 witch, P4 and P5 civilians.
    const SEATS: [Role; 5] = [
        Role::Werewolf,
        Role::Guard,
        Role::Witch,
        Role::Civilian,
        Role::Civilian,
    ];

    #[tokio::test]
    async fn test_apply_night_protection_stops_the_attack() {
        let t = table(&SEATS);
        t.engine.round().begin_night(1);
        t.engine.round().protected.insert(PlayerIndex(3));

        let dead = t.engine.apply_night(Some(PlayerIndex(3))).await.unwrap();
        assert!(dead.is_empty());
        assert!(t.engine.player(PlayerIndex(3)).is_alive());
    }

    #[tokio::test]
    async fn test_apply_night_antidote_stops_the_attack() {
        let t = table(&SEATS);
        t.engine.round().begin_night(1);
        t.engine.round().antidote.insert(PlayerIndex(3));

        let dead = t.engine.apply_night(Some(PlayerIndex(3))).await.unwrap();
        assert!(dead.is_empty());
        assert!(t.engine.player(PlayerIndex(3)).is_alive());
    }

    #[tokio::test]
    async fn test_apply_night_protection_stops_poison() {
        let t = table(&SEATS);
        t.engine.round().begin_night(1);
        {
            let mut round = t.engine.round();
            round.protected.insert(PlayerIndex(4));
            round.poisoners.insert(PlayerIndex(2));
        }
        t.engine.player(PlayerIndex(2)).set_selected(Some(PlayerIndex(4)));

        let dead = t.engine.apply_night(None).await.unwrap();
        assert!(dead.is_empty());
        assert!(t.engine.player(PlayerIndex(4)).is_alive());
    }

    #[tokio::test]
    async fn test_apply_night_attack_and_poison_both_land() {
        let t = table(&SEATS);
        t.engine.round().begin_night(1);
        t.engine.round().poisoners.insert(PlayerIndex(2));
        t.engine.player(PlayerIndex(2)).set_selected(Some(PlayerIndex(4)));

        let dead = t.engine.apply_night(Some(PlayerIndex(3))).await.unwrap();
        assert_eq!(dead, vec![PlayerIndex(3), PlayerIndex(4)]);

        let bitten = t.engine.player(PlayerIndex(3)).kill_info().unwrap();
        assert_eq!(bitten.reason, KillReason::Werewolf);
        assert_eq!(bitten.killers, vec!["P1".to_string()]);
        let poisoned = t.engine.player(PlayerIndex(4)).kill_info().unwrap();
        assert_eq!(poisoned.reason, KillReason::Poison);
        assert_eq!(poisoned.killers, vec!["P3".to_string()]);
    }

    #[tokio::test]
    async fn test_apply_night_quiet_night() {
        let t = table(&SEATS);
        t.engine.round().begin_night(1);
        let dead = t.engine.apply_night(None).await.unwrap();
        assert!(dead.is_empty());
        assert_eq!(t.engine.all().alive().len(), SEATS.len());
    }
}

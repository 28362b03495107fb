use async_trait::async_trait;
use lycan_protocol::Intent;

use super::{RoleStrategy, Turn};
use crate::GameError;
use crate::player::Ability;

pub(crate) struct Witch;

#[async_trait]
impl RoleStrategy for Witch {
    fn briefing(&self) -> &'static str {
        "You hold one antidote and one poison. Each night you learn who the \
         werewolves attacked and may save them, or poison someone instead."
    }

    /// Waits for every werewolf turn to end. This wait does not count
    /// against the witch's own time limit.
    async fn before_night(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        let barrier = turn.engine.wolf_barrier();
        if !barrier.is_complete() {
            turn.send("The werewolves are choosing their victim. Please wait.")
                .await?;
        }
        barrier.wait().await;
        Ok(())
    }

    async fn interact(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        let (antidote, poison) = turn.me.with_ability(|ability| match ability {
            Ability::Witch { antidote, poison } => (*antidote, *poison),
            _ => (false, false),
        });
        let attacked = turn
            .engine
            .resolve_wolf_target()
            .map(|index| turn.engine.player(index));

        match attacked {
            Some(victim) => {
                turn.send(&format!("Tonight the werewolves attacked {victim}."))
                    .await?
            }
            None => turn.send("Nobody was attacked tonight.").await?,
        }

        if let (true, Some(victim)) = (antidote, attacked) {
            turn.send(&format!(
                "Use your antidote to save {victim}? Reply 1 to save them, or /stop to decline."
            ))
            .await?;
            if confirm(turn).await? {
                turn.me.with_ability(|ability| {
                    if let Ability::Witch { antidote, .. } = ability {
                        *antidote = false;
                    }
                });
                turn.engine.round().antidote.insert(victim.index());
                return turn.send(&format!("You saved {victim}.")).await;
            }
        }

        if !poison {
            if !antidote {
                turn.send("You have no potions left.").await?;
            }
            return Ok(());
        }

        let candidates = turn.alive().exclude(turn.me);
        turn.send(&format!(
            "Use your poison? Pick a player, or /stop to decline:\n{}",
            candidates.show()
        ))
        .await?;
        match turn.choose(&candidates, true).await? {
            Some(victim) => {
                turn.me.set_selected(Some(victim.index()));
                turn.me.with_ability(|ability| {
                    if let Ability::Witch { poison, .. } = ability {
                        *poison = false;
                    }
                });
                turn.engine.round().poisoners.insert(turn.me.index());
                turn.send(&format!("You poisoned {victim}.")).await
            }
            None => turn.send("You keep your poison for now.").await,
        }
    }
}

/// Reads `1` (yes) or `/stop` (no).
async fn confirm(turn: &Turn<'_>) -> Result<bool, GameError> {
    loop {
        match Intent::parse(&turn.receive().await?) {
            Intent::Stop => return Ok(false),
            Intent::SelectIndex(1) => return Ok(true),
            _ => turn.send("Reply 1 or /stop.").await?,
        }
    }
}

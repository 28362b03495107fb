use async_trait::async_trait;

use super::{KillVerdict, RoleStrategy, Turn, cast_ballot};
use crate::player::Ability;
use crate::{GameError, KillReason, PlayerIndex, PlayerSet};

pub(crate) struct Idiot;

#[async_trait]
impl RoleStrategy for Idiot {
    fn briefing(&self) -> &'static str {
        "The first time the village votes you out you reveal yourself and \
         survive, but you lose your vote for the rest of the game."
    }

    async fn on_kill(&self, turn: &Turn<'_>, reason: KillReason) -> Result<KillVerdict, GameError> {
        if reason != KillReason::Vote {
            return Ok(KillVerdict::Die);
        }
        let first_reveal = turn.me.with_ability(|ability| match ability {
            Ability::Idiot { revealed } if !*revealed => {
                *revealed = true;
                true
            }
            _ => false,
        });
        if !first_reveal {
            return Ok(KillVerdict::Die);
        }
        turn.engine
            .announce(&format!(
                "{} is the Idiot! They survive the vote but can no longer vote.",
                turn.me
            ))
            .await?;
        Ok(KillVerdict::Spare)
    }

    async fn vote(
        &self,
        turn: &Turn<'_>,
        candidates: &PlayerSet<'_>,
    ) -> Result<Option<PlayerIndex>, GameError> {
        let revealed = turn
            .me
            .with_ability(|ability| matches!(ability, Ability::Idiot { revealed: true }));
        if revealed {
            turn.send("You have been revealed as the Idiot and can no longer vote.")
                .await?;
            return Ok(None);
        }
        cast_ballot(turn, candidates).await
    }
}

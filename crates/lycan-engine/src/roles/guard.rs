use async_trait::async_trait;

use super::{RoleStrategy, Turn};
use crate::GameError;
use crate::player::Ability;

pub(crate) struct Guard;

#[async_trait]
impl RoleStrategy for Guard {
    fn briefing(&self) -> &'static str {
        "Each night you may protect one player from the werewolves, but never \
         the same player two nights in a row."
    }

    async fn interact(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        // Taken up front: skipping a night lifts the restriction.
        let previous = turn.me.with_ability(|ability| match ability {
            Ability::Guard { last_protected } => last_protected.take(),
            _ => None,
        });

        let candidates = turn.alive();
        let mut prompt = format!(
            "Guard, choose a player to protect tonight, or /stop to skip:\n{}",
            candidates.show()
        );
        if let Some(previous) = previous {
            prompt.push_str(&format!(
                "\nYou protected {} last night and cannot pick them again.",
                turn.engine.player(previous)
            ));
        }
        turn.send(&prompt).await?;

        loop {
            let Some(ward) = turn.choose(&candidates, true).await? else {
                return turn.send("You protect no one tonight.").await;
            };
            if Some(ward.index()) == previous {
                turn.send(&format!(
                    "You cannot protect {ward} two nights in a row. Choose someone else."
                ))
                .await?;
                continue;
            }
            turn.me.set_selected(Some(ward.index()));
            turn.me.with_ability(|ability| {
                if let Ability::Guard { last_protected } = ability {
                    *last_protected = Some(ward.index());
                }
            });
            turn.engine.round().protected.insert(ward.index());
            return turn.send(&format!("You are protecting {ward} tonight.")).await;
        }
    }
}

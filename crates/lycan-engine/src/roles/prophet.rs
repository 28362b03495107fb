use async_trait::async_trait;

use super::{RoleStrategy, Turn};
use crate::{GameError, RoleGroup};

pub(crate) struct Prophet;

#[async_trait]
impl RoleStrategy for Prophet {
    fn briefing(&self) -> &'static str {
        "Each night you may inspect one player and learn whether they are a \
         werewolf."
    }

    async fn interact(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        let candidates = turn.alive().exclude(turn.me);
        turn.send(&format!(
            "Prophet, choose a player to inspect, or /stop to skip:\n{}",
            candidates.show()
        ))
        .await?;

        let Some(suspect) = turn.choose(&candidates, true).await? else {
            return turn.send("You skipped tonight's inspection.").await;
        };
        turn.me.set_selected(Some(suspect.index()));
        // Only wolves read as wolves; the jester reads as good.
        let verdict = if suspect.group() == RoleGroup::Werewolf {
            "a werewolf"
        } else {
            "good"
        };
        turn.send(&format!("{suspect} is {verdict}.")).await
    }
}

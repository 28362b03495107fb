use async_trait::async_trait;

use super::{KillVerdict, RoleStrategy, Turn};
use crate::{GameError, GameStatus, KillReason};

pub(crate) struct Civilian;

pub(crate) struct Jester;

#[async_trait]
impl RoleStrategy for Civilian {
    fn briefing(&self) -> &'static str {
        "You have no special ability. Find the werewolves and vote them out."
    }
}

#[async_trait]
impl RoleStrategy for Jester {
    fn briefing(&self) -> &'static str {
        "You play for yourself. If the village votes you out, you win alone and \
         the game ends at once."
    }

    async fn on_kill(&self, _turn: &Turn<'_>, reason: KillReason) -> Result<KillVerdict, GameError> {
        Ok(match reason {
            KillReason::Vote => KillVerdict::DieAndWin(GameStatus::Jester),
            _ => KillVerdict::Die,
        })
    }
}

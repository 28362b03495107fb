use async_trait::async_trait;
use lycan_sync::bounded;

use super::{RoleStrategy, Turn};
use crate::{GameError, KillReason, Player, PlayerIndex};

pub(crate) struct Hunter;

#[async_trait]
impl RoleStrategy for Hunter {
    fn briefing(&self) -> &'static str {
        "When you die, unless poisoned, you may shoot one player and take them \
         with you."
    }

    async fn post_kill(&self, turn: &Turn<'_>) -> Result<Option<PlayerIndex>, GameError> {
        shoot(turn).await
    }
}

/// The dying shooter's pick. Poison takes the shot away; silence or
/// `/stop` holds fire.
pub(crate) async fn shoot(turn: &Turn<'_>) -> Result<Option<PlayerIndex>, GameError> {
    let poisoned = turn
        .me
        .kill_info()
        .is_some_and(|info| info.reason == KillReason::Poison);
    if poisoned {
        turn.send("You were poisoned, so you cannot shoot.").await?;
        return Ok(None);
    }

    let targets = turn.alive();
    if targets.is_empty() {
        return Ok(None);
    }
    turn.send(&format!(
        "You have died. Pick a player to take with you, or send /stop to hold \
         your fire:\n{}",
        targets.show()
    ))
    .await?;

    let limit = turn.engine.config.timeouts.interact();
    match bounded("shoot", limit, turn.choose(&targets, true)).await {
        Some(pick) => {
            let pick = pick?;
            if pick.is_none() {
                turn.send("You held your fire.").await?;
            }
            Ok(pick.map(Player::index))
        }
        None => {
            turn.send("Time is up; you did not shoot.").await?;
            Ok(None)
        }
    }
}

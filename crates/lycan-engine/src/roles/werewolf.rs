use async_trait::async_trait;
use lycan_protocol::Intent;

use super::{RoleStrategy, Turn, shooter};
use crate::{Faction, GameError, PlayerIndex, Timeouts};

pub(crate) struct Werewolf;

pub(crate) struct WolfKing;

#[async_trait]
impl RoleStrategy for Werewolf {
    fn briefing(&self) -> &'static str {
        "Each night, agree with your pack on a victim. The werewolves win once \
         they match the rest of the table in number, or wipe out the priesthood \
         or the civilians."
    }

    async fn notify(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        introduce(turn, self.briefing()).await
    }

    fn night_timeout(&self, timeouts: &Timeouts) -> std::time::Duration {
        timeouts.werewolf()
    }

    async fn interact(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        hunt(turn).await
    }
}

#[async_trait]
impl RoleStrategy for WolfKing {
    fn briefing(&self) -> &'static str {
        "You hunt with the werewolves. When you die, unless poisoned, you may \
         shoot one player and take them with you."
    }

    async fn notify(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        introduce(turn, self.briefing()).await
    }

    fn night_timeout(&self, timeouts: &Timeouts) -> std::time::Duration {
        timeouts.werewolf()
    }

    async fn interact(&self, turn: &Turn<'_>) -> Result<(), GameError> {
        hunt(turn).await
    }

    async fn post_kill(&self, turn: &Turn<'_>) -> Result<Option<PlayerIndex>, GameError> {
        shooter::shoot(turn).await
    }
}

/// Role message plus the list of teammates.
async fn introduce(turn: &Turn<'_>, briefing: &str) -> Result<(), GameError> {
    let pack = turn
        .engine
        .all()
        .select(Faction::Werewolf)
        .exclude(turn.me);
    let mut text = format!("Your role: {}.\n{briefing}", turn.me.role());
    if pack.is_empty() {
        text.push_str("\nYou hunt alone.");
    } else {
        let mates: Vec<String> = pack
            .iter()
            .map(|wolf| format!("{wolf} ({})", wolf.role()))
            .collect();
        text.push_str(&format!("\nYour pack: {}", mates.join(", ")));
    }
    turn.send(&text).await
}

/// The night discussion: pick (and re-pick) a victim, chat with the pack,
/// `/stop` once a pick is in.
async fn hunt(turn: &Turn<'_>) -> Result<(), GameError> {
    let alive = turn.alive();
    let pack = alive.select(Faction::Werewolf).exclude(turn.me);
    turn.send(&format!(
        "Werewolves, choose tonight's victim by number. You can change your \
         pick until you send /stop. Anything else you write goes to your pack.\n{}",
        alive.show()
    ))
    .await?;

    loop {
        let text = turn.receive().await?;
        match Intent::parse(&text) {
            Intent::Stop if turn.me.selected().is_some() => {
                turn.send("Your pick is in. Waiting for the rest of the pack.")
                    .await?;
                turn.engine
                    .tell_all(&pack, &format!("{} has ended their turn.", turn.me))
                    .await?;
                return Ok(());
            }
            Intent::Stop => turn.send("Pick a victim before sending /stop.").await?,
            intent @ Intent::SelectIndex(_) => {
                let victim = intent
                    .position_in(alive.len())
                    .and_then(|pos| alive.get(pos));
                match victim {
                    Some(victim) => {
                        turn.me.set_selected(Some(victim.index()));
                        turn.send(&format!("You picked {victim}.")).await?;
                        turn.engine
                            .tell_all(&pack, &format!("{} picked {victim}.", turn.me))
                            .await?;
                    }
                    None => {
                        turn.send(&format!("Reply with a number from 1 to {}.", alive.len()))
                            .await?;
                    }
                }
            }
            _ => {
                turn.engine
                    .tell_all(&pack, &format!("[{}] {text}", turn.me))
                    .await?;
            }
        }
    }
}

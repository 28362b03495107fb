//! The round loop.
//!
//! ```text
//! NIGHT → DAY_ANNOUNCE → (FIRST_NIGHT_EULOGY) → DISCUSSION → VOTE → NIGHT
//! ```
//!
//! The win check runs before every night and after every announcement
//! and vote. A win unwinds the loop as `Halt::Finished`.

mod day;
mod night;
mod vote;

use std::convert::Infallible;

use futures_util::future::try_join_all;

use crate::engine::Engine;
use crate::error::{Halt, Step};
use crate::roles::{Turn, strategy_for};
use crate::{Faction, GameError, GameStatus, Player, Role};

impl Engine {
    /// Plays the game to the end and posts the final summary.
    pub(crate) async fn play(&self) -> Result<GameStatus, GameError> {
        match self.rounds().await {
            Ok(never) => match never {},
            Err(Halt::Finished(status)) => {
                tracing::info!(group = %self.group, %status, "win condition reached");
                self.report_result(status).await?;
                Ok(status)
            }
            Err(Halt::Failed(err)) => Err(err),
        }
    }

    async fn rounds(&self) -> Step<Infallible> {
        self.notify_roles().await?;
        loop {
            self.check()?;
            let dead = self.night().await?;
            self.dawn(dead).await?;
            self.check()?;
            self.discussion().await?;
            self.vote().await?;
        }
    }

    /// Opening announcement plus every player's private role message.
    async fn notify_roles(&self) -> Result<(), GameError> {
        let all = self.all();
        let mut text = format!(
            "The game begins with {} players: {} werewolves, {} priesthood, {} civilians",
            all.len(),
            all.select(Faction::Werewolf).len(),
            all.select(Faction::Priesthood).len(),
            all.select(Faction::Civilian).len(),
        );
        let neutral = all.select(Faction::Neutral).len();
        if neutral > 0 {
            text.push_str(&format!(", {neutral} neutral"));
        }
        text.push('.');
        if self.config.show_roles_on_start {
            let mut roles: Vec<Role> = all.iter().map(Player::role).collect();
            roles.sort();
            let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
            text.push_str(&format!("\nRoles in play: {}", roles.join(", ")));
        }
        text.push_str("\nCheck your private messages for your role.");
        self.announce(&text).await?;

        try_join_all(all.iter().map(|player| async move {
            let turn = Turn::new(self, player);
            strategy_for(player.role()).notify(&turn).await
        }))
        .await?;
        Ok(())
    }

    /// Winner, every role, and the death report.
    async fn report_result(&self, status: GameStatus) -> Result<(), GameError> {
        let mut lines = vec![format!("Game over: {status} win!"), String::new(), "Roles:".to_owned()];
        for player in self.all().iter() {
            let fate = if player.is_alive() { "" } else { " (dead)" };
            lines.push(format!("{player}: {}{fate}", player.role()));
        }
        let report = self.death_report();
        if !report.is_empty() {
            lines.push(String::new());
            lines.push("Death report:".to_owned());
            lines.extend(report.iter().map(ToString::to_string));
        }
        self.announce(&lines.join("\n")).await
    }
}

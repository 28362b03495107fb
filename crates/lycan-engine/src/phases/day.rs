//! Morning announcement, first-night eulogy, and discussion.

use crate::engine::Engine;
use crate::error::Step;
use crate::{GameError, PlayerIndex, PlayerSet};

impl Engine {
    /// Announces the night's dead and runs their post-death effects.
    pub(crate) async fn dawn(&self, dead: Vec<PlayerIndex>) -> Step<()> {
        let (day, wolf_target) = {
            let mut round = self.round();
            round.day += 1;
            (round.day, round.wolf_target.flatten())
        };
        tracing::info!(group = %self.group, day, deaths = dead.len(), "day breaks");

        let victims = PlayerSet::new(dead.iter().map(|&index| self.player(index)));
        let text = if victims.is_empty() {
            format!("Day {day}. The sun rises: it was a peaceful night.")
        } else {
            format!(
                "Day {day}. The sun rises. Last night these players died: {}",
                victims.names()
            )
        };
        self.announce(&text).await?;

        // Only the very first werewolf victim gets last words at dawn.
        if day == 1 {
            if let Some(first) = wolf_target.filter(|t| dead.contains(t)) {
                let first = self.player(first);
                self.announce(&format!(
                    "{first}, as the first victim you may say your last words. \
                     Send /stop when you are done."
                ))
                .await?;
                self.last_words(first).await?;
            }
        }

        self.post_kill(dead).await
    }

    /// Lists the living and lets them talk.
    pub(crate) async fn discussion(&self) -> Result<(), GameError> {
        let alive = self.all().alive();
        self.announce(&format!("Players still alive:\n{}", alive.show()))
            .await?;
        let timeouts = &self.config.timeouts;

        if self.config.speak_in_turn {
            for &index in &self.speaking_order {
                let speaker = self.player(index);
                if !speaker.is_alive() {
                    continue;
                }
                self.announce(&format!(
                    "{speaker}, it is your turn to speak ({}s). Send /stop when you are done.",
                    timeouts.speak_secs
                ))
                .await?;
                self.wait_for_stop(&PlayerSet::new([speaker]), timeouts.speak(), "speak")
                    .await?;
            }
        } else {
            self.announce(&format!(
                "Free discussion for {}s. It ends early once every living player \
                 has sent /stop.",
                timeouts.group_speak_secs
            ))
            .await?;
            self.wait_for_stop(&alive, timeouts.group_speak(), "discussion")
                .await?;
        }
        Ok(())
    }
}

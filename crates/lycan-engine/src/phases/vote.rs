//! The daytime vote.

use std::collections::BTreeMap;

use futures_util::future::join_all;
use lycan_sync::bounded;

use crate::engine::Engine;
use crate::error::Step;
use crate::outcome::{VoteOutcome, resolve_votes};
use crate::roles::{Turn, strategy_for};
use crate::{GameError, KillReason, Player, PlayerIndex, PlayerSet};

type Tally = BTreeMap<PlayerIndex, Vec<PlayerIndex>>;

impl Engine {
    /// Collects every living player's ballot, publishes the count, and
    /// eliminates the leader if there is one.
    pub(crate) async fn vote(&self) -> Step<()> {
        let alive = self.all().alive();
        self.announce(&format!(
            "Time to vote. Check your private messages; you have {}s.",
            self.config.timeouts.vote_secs
        ))
        .await?;

        let ballots = join_all(alive.iter().map(|voter| self.ballot(voter, &alive))).await;
        let mut tally = Tally::new();
        let mut cast = 0;
        for ballot in ballots {
            let (voter, choice) = ballot?;
            if let Some(target) = choice {
                tally.entry(target).or_default().push(voter);
                cast += 1;
            }
        }
        let abstain = alive.len() - cast;
        self.publish_tally(&tally, abstain).await?;

        let outcome = resolve_votes(&tally, abstain);
        tracing::info!(group = %self.group, ?outcome, abstain, "vote resolved");
        match outcome {
            VoteOutcome::NoVotes => {
                self.announce("Nobody cast a vote. No one is eliminated.").await?;
            }
            VoteOutcome::AbstainMajority { abstain, top } => {
                self.announce(&format!(
                    "{abstain} abstentions against a top count of {top}. No one is eliminated."
                ))
                .await?;
            }
            VoteOutcome::Tie(leaders) => {
                let leaders = PlayerSet::new(leaders.iter().map(|&i| self.player(i)));
                self.announce(&format!(
                    "Tie between {}. No one is eliminated.",
                    leaders.names()
                ))
                .await?;
            }
            VoteOutcome::Eliminate(target) => {
                let voters = tally.get(&target).cloned().unwrap_or_default();
                if self.kill(target, KillReason::Vote, &voters).await?.is_some() {
                    let target = self.player(target);
                    self.announce(&format!(
                        "{target} has been voted out. {target}, you may say your last \
                         words; send /stop when you are done."
                    ))
                    .await?;
                    self.last_words(target).await?;
                    self.post_kill(vec![target.index()]).await?;
                }
            }
        }
        Ok(())
    }

    /// One player's ballot; a timeout is an abstention.
    async fn ballot(
        &self,
        voter: &Player,
        alive: &PlayerSet<'_>,
    ) -> Result<(PlayerIndex, Option<PlayerIndex>), GameError> {
        let turn = Turn::new(self, voter);
        let candidates = alive.exclude(voter);
        let strategy = strategy_for(voter.role());
        let choice = match bounded("vote", self.config.timeouts.vote(), strategy.vote(&turn, &candidates)).await {
            Some(choice) => choice?,
            None => {
                turn.send("Voting time is over; you abstained.").await?;
                None
            }
        };
        Ok((voter.index(), choice))
    }

    async fn publish_tally(&self, tally: &Tally, abstain: usize) -> Result<(), GameError> {
        let mut lines = vec!["Vote results:".to_owned()];
        for (&target, voters) in tally {
            let voters = PlayerSet::new(voters.iter().map(|&v| self.player(v)));
            lines.push(format!(
                "{}: {} ({})",
                self.player(target),
                voters.len(),
                voters.names()
            ));
        }
        lines.push(format!("Abstained: {abstain}"));
        self.announce(&lines.join("\n")).await
    }
}

//! Pure decision functions: the win check and the vote tally.

use std::collections::BTreeMap;

use crate::{Faction, GameStatus, PlayerIndex, PlayerSet};

/// Decides whether the game is over, looking only at who is alive.
///
/// Checked in order:
///
/// 1. werewolves alive ≥ everyone else alive → werewolves win
/// 2. no civilians or neutrals left → werewolves win
/// 3. no priesthood left → werewolves win
/// 4. no werewolves left → village wins
pub fn check_status(players: &PlayerSet<'_>) -> Option<GameStatus> {
    let alive = players.alive();
    let wolves = alive.select(Faction::Werewolf).len();
    let others = alive.len() - wolves;

    if wolves >= others {
        return Some(GameStatus::Werewolf);
    }
    if alive.select(Faction::Civilian).is_empty() && alive.select(Faction::Neutral).is_empty() {
        return Some(GameStatus::Werewolf);
    }
    if alive.select(Faction::Priesthood).is_empty() {
        return Some(GameStatus::Werewolf);
    }
    if wolves == 0 {
        return Some(GameStatus::GoodGuy);
    }
    None
}

/// How a vote ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Nobody voted for anyone.
    NoVotes,
    /// Abstentions matched or beat the leading target.
    AbstainMajority { abstain: usize, top: usize },
    /// Several targets share the top count.
    Tie(Vec<PlayerIndex>),
    /// A single target leads.
    Eliminate(PlayerIndex),
}

/// Settles a vote.
///
/// `ballots` maps each target to the voters who picked them; `abstain`
/// counts everyone who could vote but did not.
pub fn resolve_votes(
    ballots: &BTreeMap<PlayerIndex, Vec<PlayerIndex>>,
    abstain: usize,
) -> VoteOutcome {
    let Some(top) = ballots.values().map(Vec::len).max().filter(|&n| n > 0) else {
        return VoteOutcome::NoVotes;
    };
    if abstain >= top {
        return VoteOutcome::AbstainMajority { abstain, top };
    }
    let leaders: Vec<PlayerIndex> = ballots
        .iter()
        .filter(|(_, voters)| voters.len() == top)
        .map(|(&target, _)| target)
        .collect();
    match leaders.as_slice() {
        [only] => VoteOutcome::Eliminate(*only),
        _ => VoteOutcome::Tie(leaders),
    }
}

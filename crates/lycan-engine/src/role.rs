//! Roles, factions, and game outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// A player's secret identity.
///
/// The role fixes the player's [`RoleGroup`] (what the prophet sees) and
/// [`Faction`] (what the win check counts). Behavior lives in the
/// matching strategy under `roles/`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Role {
    Werewolf,
    WolfKing,
    Prophet,
    Witch,
    Hunter,
    Guard,
    Idiot,
    Civilian,
    Jester,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 9] = [
        Role::Werewolf,
        Role::WolfKing,
        Role::Prophet,
        Role::Witch,
        Role::Hunter,
        Role::Guard,
        Role::Idiot,
        Role::Civilian,
        Role::Jester,
    ];

    /// The alignment a prophet inspection reveals.
    pub fn group(self) -> RoleGroup {
        match self {
            Self::Werewolf | Self::WolfKing => RoleGroup::Werewolf,
            Self::Jester => RoleGroup::Others,
            _ => RoleGroup::GoodGuy,
        }
    }

    /// The faction the win check counts this role under.
    pub fn faction(self) -> Faction {
        match self {
            Self::Werewolf | Self::WolfKing => Faction::Werewolf,
            Self::Prophet | Self::Witch | Self::Hunter | Self::Guard | Self::Idiot => {
                Faction::Priesthood
            }
            Self::Civilian => Faction::Civilian,
            Self::Jester => Faction::Neutral,
        }
    }

    /// Roles that may take someone with them when they die.
    pub fn can_shoot(self) -> bool {
        matches!(self, Self::Hunter | Self::WolfKing)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Werewolf => "Werewolf",
            Self::WolfKing => "Wolf King",
            Self::Prophet => "Prophet",
            Self::Witch => "Witch",
            Self::Hunter => "Hunter",
            Self::Guard => "Guard",
            Self::Idiot => "Idiot",
            Self::Civilian => "Civilian",
            Self::Jester => "Jester",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// RoleGroup / Faction
// ---------------------------------------------------------------------------

/// Coarse alignment. The prophet only ever learns this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleGroup {
    Werewolf,
    GoodGuy,
    Others,
}

impl fmt::Display for RoleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Werewolf => write!(f, "werewolf"),
            Self::GoodGuy => write!(f, "good"),
            Self::Others => write!(f, "neutral"),
        }
    }
}

/// Win-check bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Werewolf,
    Priesthood,
    Civilian,
    Neutral,
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Werewolf => write!(f, "werewolves"),
            Self::Priesthood => write!(f, "priesthood"),
            Self::Civilian => write!(f, "civilians"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

// ---------------------------------------------------------------------------
// Kills and outcomes
// ---------------------------------------------------------------------------

/// How a player died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KillReason {
    Werewolf,
    Poison,
    Shoot,
    Vote,
}

impl KillReason {
    /// Past-tense phrase for the death report.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Werewolf => "was killed by the werewolves",
            Self::Poison => "was poisoned",
            Self::Shoot => "was shot",
            Self::Vote => "was voted out",
        }
    }
}

/// Recorded on a player when they die. Set once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillInfo {
    /// Cause of death.
    pub reason: KillReason,
    /// Display names of whoever caused it (wolves, the witch, the
    /// shooter, or the voters).
    pub killers: Vec<String>,
}

/// The result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The werewolves win.
    Werewolf,
    /// The village (priesthood and civilians) wins.
    GoodGuy,
    /// The jester got themselves voted out.
    Jester,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Werewolf => write!(f, "the werewolves"),
            Self::GoodGuy => write!(f, "the village"),
            Self::Jester => write!(f, "the jester"),
        }
    }
}

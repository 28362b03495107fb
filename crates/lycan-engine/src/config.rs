//! Game configuration.
//!
//! Loaded once per game. Hosts usually keep a JSON file and hand the
//! parsed [`GameConfig`] to [`Game::new`](crate::Game::new), which
//! validates it before dealing roles.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Faction, Role};

// ---------------------------------------------------------------------------
// Preset
// ---------------------------------------------------------------------------

/// How many of each faction a game of a given size gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub werewolves: usize,
    pub priesthood: usize,
    pub civilians: usize,
}

impl Preset {
    pub const fn new(werewolves: usize, priesthood: usize, civilians: usize) -> Self {
        Self {
            werewolves,
            priesthood,
            civilians,
        }
    }

    /// Total number of seats.
    pub fn total(&self) -> usize {
        self.werewolves + self.priesthood + self.civilians
    }
}

// ---------------------------------------------------------------------------
// Policies and timeouts
// ---------------------------------------------------------------------------

/// What happens when the werewolves pick different targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WolfConsensus {
    /// Nobody dies tonight.
    #[default]
    NoKill,
    /// One of the chosen targets is picked at random.
    RandomPick,
}

/// Per-interaction time limits, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// The werewolves' night discussion.
    pub werewolf_secs: u64,
    /// Single-target night skills and the shooter's pick.
    pub interact_secs: u64,
    /// One player's turn in turn-based discussion.
    pub speak_secs: u64,
    /// Free discussion.
    pub group_speak_secs: u64,
    /// Casting a ballot.
    pub vote_secs: u64,
    /// Last words.
    pub eulogy_secs: u64,
}

impl Timeouts {
    pub fn werewolf(&self) -> Duration {
        Duration::from_secs(self.werewolf_secs)
    }

    pub fn interact(&self) -> Duration {
        Duration::from_secs(self.interact_secs)
    }

    pub fn speak(&self) -> Duration {
        Duration::from_secs(self.speak_secs)
    }

    pub fn group_speak(&self) -> Duration {
        Duration::from_secs(self.group_speak_secs)
    }

    pub fn vote(&self) -> Duration {
        Duration::from_secs(self.vote_secs)
    }

    pub fn eulogy(&self) -> Duration {
        Duration::from_secs(self.eulogy_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            werewolf_secs: 120,
            interact_secs: 60,
            speak_secs: 60,
            group_speak_secs: 120,
            vote_secs: 60,
            eulogy_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Everything a game needs to know before it starts.
///
/// Missing JSON fields fall back to [`GameConfig::default`], so a file
/// only has to list what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Faction counts keyed by player count. The keys are the only
    /// supported game sizes.
    pub presets: BTreeMap<usize, Preset>,

    /// Werewolf roles in the order they are handed out.
    pub werewolf_priority: Vec<Role>,

    /// Priesthood roles in the order they are handed out.
    pub priesthood_priority: Vec<Role>,

    /// Chance that one civilian seat becomes the Jester (needs at least
    /// two civilians).
    pub jester_probability: f64,

    /// How a split werewolf vote is settled.
    pub wolf_consensus: WolfConsensus,

    /// Turn-based discussion instead of free discussion.
    pub speak_in_turn: bool,

    /// List the roles in play in the opening announcement.
    pub show_roles_on_start: bool,

    /// Dead-channel messages admitted per player per minute.
    pub dead_channel_rate_limit: usize,

    /// Night padding (min, max seconds) used when no witch is alive.
    pub witch_absence_delay_secs: (u64, u64),

    pub timeouts: Timeouts,
}

impl Default for GameConfig {
    fn default() -> Self {
        let presets = [
            (6, Preset::new(1, 2, 3)),
            (7, Preset::new(2, 2, 3)),
            (8, Preset::new(2, 3, 3)),
            (9, Preset::new(2, 4, 3)),
            (10, Preset::new(3, 4, 3)),
            (11, Preset::new(3, 5, 3)),
            (12, Preset::new(4, 5, 3)),
        ]
        .into_iter()
        .collect();
        Self {
            presets,
            werewolf_priority: vec![
                Role::Werewolf,
                Role::Werewolf,
                Role::WolfKing,
                Role::Werewolf,
            ],
            priesthood_priority: vec![
                Role::Witch,
                Role::Prophet,
                Role::Hunter,
                Role::Guard,
                Role::Idiot,
            ],
            jester_probability: 0.0,
            wolf_consensus: WolfConsensus::default(),
            speak_in_turn: false,
            show_roles_on_start: false,
            dead_channel_rate_limit: 8,
            witch_absence_delay_secs: (5, 20),
            timeouts: Timeouts::default(),
        }
    }
}

impl GameConfig {
    /// Parses a JSON document. Does not validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file. Does not validate.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Looks up the preset for `players`.
    pub fn preset_for(&self, players: usize) -> Result<Preset, ConfigError> {
        self.presets
            .get(&players)
            .copied()
            .ok_or_else(|| ConfigError::UnsupportedPlayerCount {
                count: players,
                supported: self.presets.keys().copied().collect(),
            })
    }

    /// The witch-absence padding as a duration range.
    pub fn witch_absence_delay(&self) -> RangeInclusive<Duration> {
        let (lo, hi) = self.witch_absence_delay_secs;
        Duration::from_secs(lo)..=Duration::from_secs(hi.max(lo))
    }

    /// Checks internal consistency and returns the config unchanged.
    ///
    /// Every preset must add up to its key and have at least one
    /// werewolf; the priority lists must be long enough for the largest
    /// preset and only name roles of their own faction.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&self.jester_probability) {
            return Err(ConfigError::InvalidProbability(self.jester_probability));
        }

        check_priority("werewolf", &self.werewolf_priority, Faction::Werewolf)?;
        check_priority("priesthood", &self.priesthood_priority, Faction::Priesthood)?;

        for (&players, preset) in &self.presets {
            if preset.total() != players {
                return Err(ConfigError::InvalidPreset {
                    players,
                    reason: format!("counts add up to {}", preset.total()),
                });
            }
            if preset.werewolves == 0 {
                return Err(ConfigError::InvalidPreset {
                    players,
                    reason: "no werewolves".into(),
                });
            }
            if preset.werewolves > self.werewolf_priority.len() {
                return Err(ConfigError::PriorityListTooShort {
                    list: "werewolf",
                    needed: preset.werewolves,
                    available: self.werewolf_priority.len(),
                });
            }
            if preset.priesthood > self.priesthood_priority.len() {
                return Err(ConfigError::PriorityListTooShort {
                    list: "priesthood",
                    needed: preset.priesthood,
                    available: self.priesthood_priority.len(),
                });
            }
        }
        Ok(self)
    }
}

fn check_priority(
    list: &'static str,
    roles: &[Role],
    faction: Faction,
) -> Result<(), ConfigError> {
    match roles.iter().find(|role| role.faction() != faction) {
        Some(&role) => Err(ConfigError::MisplacedRole { list, role }),
        None => Ok(()),
    }
}

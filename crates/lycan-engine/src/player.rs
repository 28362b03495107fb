//! Players and their per-game state.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use lycan_protocol::{Target, UserId};
use lycan_sync::Signal;
use serde::{Deserialize, Serialize};

use crate::{Faction, KillInfo, Role, RoleGroup};

/// Position of a player in the engine's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerIndex(pub(crate) usize);

impl PlayerIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Ability memory
// ---------------------------------------------------------------------------

/// Role-specific memory that survives from night to night.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Ability {
    None,
    Witch { antidote: bool, poison: bool },
    Guard { last_protected: Option<PlayerIndex> },
    Idiot { revealed: bool },
}

impl Ability {
    fn for_role(role: Role) -> Self {
        match role {
            Role::Witch => Self::Witch {
                antidote: true,
                poison: true,
            },
            Role::Guard => Self::Guard {
                last_protected: None,
            },
            Role::Idiot => Self::Idiot { revealed: false },
            _ => Self::None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct PlayerState {
    pub(crate) alive: bool,
    pub(crate) kill_info: Option<KillInfo>,
    /// This round's pick (wolf target, guard target, poison target...).
    pub(crate) selected: Option<PlayerIndex>,
    pub(crate) ability: Ability,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One seat at the table.
///
/// Identity and role never change. The mutable part sits behind a
/// short-lived lock; nothing holds it across an `.await`.
#[derive(Debug)]
pub struct Player {
    index: PlayerIndex,
    user_id: UserId,
    name: String,
    role: Role,
    state: Mutex<PlayerState>,
    departed: Signal,
}

impl Player {
    pub(crate) fn new(index: PlayerIndex, user_id: UserId, name: String, role: Role) -> Self {
        Self {
            index,
            user_id,
            name,
            role,
            state: Mutex::new(PlayerState {
                alive: true,
                kill_info: None,
                selected: None,
                ability: Ability::for_role(role),
            }),
            departed: Signal::new(),
        }
    }

    pub fn index(&self) -> PlayerIndex {
        self.index
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn group(&self) -> RoleGroup {
        self.role.group()
    }

    pub fn faction(&self) -> Faction {
        self.role.faction()
    }

    /// Private-chat target for this player.
    pub fn target(&self) -> Target {
        Target::User(self.user_id.clone())
    }

    pub fn is_alive(&self) -> bool {
        self.state().alive
    }

    pub fn kill_info(&self) -> Option<KillInfo> {
        self.state().kill_info.clone()
    }

    /// Fires once the player has died and every post-death effect ran.
    pub fn departed(&self) -> &Signal {
        &self.departed
    }

    pub fn has_departed(&self) -> bool {
        self.departed.is_set()
    }

    pub fn selected(&self) -> Option<PlayerIndex> {
        self.state().selected
    }

    pub(crate) fn set_selected(&self, target: Option<PlayerIndex>) {
        self.state().selected = target;
    }

    /// Flips the alive flag and stores `info`. Returns `false` (and
    /// changes nothing) if the player was already dead.
    pub(crate) fn mark_dead(&self, info: KillInfo) -> bool {
        let mut state = self.state();
        if !state.alive {
            return false;
        }
        state.alive = false;
        state.kill_info = Some(info);
        true
    }

    /// Runs `f` against this player's ability memory.
    pub(crate) fn with_ability<R>(&self, f: impl FnOnce(&mut Ability) -> R) -> R {
        f(&mut self.state().ability)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let state = self.state();
        PlayerSnapshot {
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            role: self.role,
            alive: state.alive,
            departed: self.departed.is_set(),
            kill_info: state.kill_info.clone(),
        }
    }

    fn state(&self) -> MutexGuard<'_, PlayerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Read-only views
// ---------------------------------------------------------------------------

/// A point-in-time copy of a player, safe to hand to hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
    pub alive: bool,
    pub departed: bool,
    pub kill_info: Option<KillInfo>,
}

/// One line of the death report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
    pub kill_info: KillInfo,
}

impl fmt::Display for DeathRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.name, self.role, self.kill_info.reason.describe())?;
        if !self.kill_info.killers.is_empty() {
            write!(f, " by {}", self.kill_info.killers.join(", "))?;
        }
        Ok(())
    }
}

//! The Werewolf game engine.
//!
//! A [`Game`] deals roles, then loops night → day → discussion → vote
//! until one side wins. Players are reached through a
//! [`ChatTransport`](lycan_transport::ChatTransport) and answer through
//! an [`InputStore`](lycan_transport::InputStore).
//!
//! # Key types
//!
//! - [`Game`]: one running game
//! - [`GameConfig`]: presets, priority lists, timeouts, behavior flags
//! - [`Role`] / [`RoleGroup`] / [`Faction`]: identities and win buckets
//! - [`PlayerSet`]: ordered, filterable player views
//! - [`check_status`] / [`resolve_votes`]: the pure decision rules

mod assign;
mod config;
mod context;
mod dead_channel;
mod engine;
mod error;
mod game;
mod outcome;
mod phases;
mod player;
mod player_set;
mod role;
mod roles;

#[cfg(test)]
mod testkit;

pub use assign::deal_roles;
pub use config::{GameConfig, Preset, Timeouts, WolfConsensus};
pub use error::{ConfigError, GameError};
pub use game::Game;
pub use outcome::{VoteOutcome, check_status, resolve_votes};
pub use player::{DeathRecord, Player, PlayerIndex, PlayerSnapshot};
pub use player_set::{PlayerSet, Selector};
pub use role::{Faction, GameStatus, KillInfo, KillReason, Role, RoleGroup};

//! Shared vocabulary for Lycan.
//!
//! This crate defines the small set of types every other layer speaks:
//!
//! - **Identity** ([`UserId`], [`GroupId`]): opaque ids handed to us by
//!   the chat platform.
//! - **Addressing** ([`Target`]): where an outgoing text goes.
//! - **Intents** ([`Intent`]): what a raw incoming text means to the game.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Chat platform (raw text) → Protocol (Intent, Target) → Engine (game rules)
//! ```
//!
//! The protocol layer knows nothing about rounds or roles. It only turns
//! text into intents and names the places text can be sent to.

mod error;
mod intent;
mod types;

pub use error::ProtocolError;
pub use intent::Intent;
pub use types::{GroupId, Target, UserId};

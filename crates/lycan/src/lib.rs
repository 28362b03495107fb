//! # Lycan
//!
//! Werewolf (Mafia) for text chat, driven by a bot.
//!
//! The host adapts its chat platform to [`ChatTransport`], feeds every
//! incoming text into an [`InputStore`], and starts games through a
//! [`GameManager`]. Everything else (role dealing, night and day phases,
//! voting, the dead players' channel) happens inside [`Game::run`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lycan::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), LycanError> {
//! let (transport, _outbox) = MemoryTransport::new();
//! let manager = GameManager::new(
//!     Arc::new(transport),
//!     Arc::new(InputStore::new()),
//!     GameConfig::default(),
//! );
//! let roster = (1..=6).map(|i| (UserId::from(format!("u{i}")), format!("P{i}")));
//! let handle = manager.start(GroupId::from("table-1"), roster)?;
//! // Route chat with `manager.deliver(..)` while the game runs.
//! let _status = handle.await;
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;

pub use error::{LycanError, ManagerError};
pub use manager::{GameManager, INTERNAL_ERROR_MESSAGE};

pub use lycan_engine::{
    ConfigError, DeathRecord, Faction, Game, GameConfig, GameError, GameStatus, KillInfo,
    KillReason, PlayerSnapshot, Preset, Role, RoleGroup, Timeouts, WolfConsensus,
};
pub use lycan_protocol::{GroupId, Intent, ProtocolError, Target, UserId};
#[cfg(feature = "memory")]
pub use lycan_transport::{MemoryTransport, Outgoing};
pub use lycan_transport::{ChatTransport, InputStore, MailboxError, Receipt, TransportError};

pub mod prelude {
    //! The types most hosts need, in one import.

    pub use crate::{
        ChatTransport, Game, GameConfig, GameError, GameManager, GameStatus, GroupId,
        InputStore, Intent, LycanError, Role, Target, UserId,
    };
    #[cfg(feature = "memory")]
    pub use crate::{MemoryTransport, Outgoing};
}

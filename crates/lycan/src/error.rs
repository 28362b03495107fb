//! Unified error type for Lycan.

use lycan_engine::{ConfigError, GameError};
use lycan_protocol::{GroupId, ProtocolError};
use lycan_transport::{MailboxError, TransportError};

/// Errors from the [`GameManager`](crate::GameManager) registry.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The group already has a game running.
    #[error("a game is already running in {0}")]
    AlreadyRunning(GroupId),

    /// The group has no game running.
    #[error("no game is running in {0}")]
    NotRunning(GroupId),
}

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` attributes let `?` convert sub-crate errors, so hosts
/// using the `lycan` meta-crate only ever deal with this one type.
#[derive(Debug, thiserror::Error)]
pub enum LycanError {
    /// Parsing an id or intent failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Sending to the chat platform failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An input mailbox was closed.
    #[error(transparent)]
    Mailbox(#[from] MailboxError),

    /// The game configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A game could not be built or failed while running.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The manager refused the request.
    #[error(transparent)]
    Manager(#[from] ManagerError),
}

//! Error types for the engine.

use lycan_protocol::UserId;
use lycan_transport::{MailboxError, TransportError};

use crate::GameStatus;

/// Problems with the game configuration or the requested player count.
///
/// These are always fatal at construction time: a game with a bad
/// configuration never starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No preset exists for this many players.
    #[error("unsupported player count {count} (supported: {supported:?})")]
    UnsupportedPlayerCount { count: usize, supported: Vec<usize> },

    /// A preset's counts are inconsistent.
    #[error("invalid preset for {players} players: {reason}")]
    InvalidPreset { players: usize, reason: String },

    /// A priority list cannot cover what some preset asks of it.
    #[error("{list} priority list has {available} roles, a preset needs {needed}")]
    PriorityListTooShort {
        list: &'static str,
        needed: usize,
        available: usize,
    },

    /// A priority list names a role from the wrong faction.
    #[error("{role} does not belong in the {list} priority list")]
    MisplacedRole {
        list: &'static str,
        role: crate::Role,
    },

    /// A probability outside `0.0..=1.0`.
    #[error("probability must be within 0..=1, got {0}")]
    InvalidProbability(f64),

    /// The configuration file could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a game.
///
/// Phase timeouts are not errors: they fall back to a default action
/// (abstain, no target, skill cancelled) inside the phase that owns them.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The configuration was rejected at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sending to the chat platform failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The host closed the input store mid-game.
    #[error(transparent)]
    Mailbox(#[from] MailboxError),

    /// The same user appears twice in the roster.
    #[error("player {0} appears twice in the roster")]
    DuplicatePlayer(UserId),

    /// `run` was called on a game that already ran.
    #[error("game already started")]
    AlreadyStarted,

    /// An operator forced the game to stop.
    #[error("game terminated")]
    Terminated,
}

/// Why the round loop stopped.
///
/// A win is not a failure, so it does not travel as a [`GameError`].
/// Phase code returns `Result<T, Halt>` and uses `?` for both.
#[derive(Debug)]
pub(crate) enum Halt {
    /// A win condition fired.
    Finished(GameStatus),
    /// Something went wrong.
    Failed(GameError),
}

impl From<GameError> for Halt {
    fn from(err: GameError) -> Self {
        Self::Failed(err)
    }
}

impl From<TransportError> for Halt {
    fn from(err: TransportError) -> Self {
        Self::Failed(err.into())
    }
}

/// Result type for phase code.
pub(crate) type Step<T> = Result<T, Halt>;

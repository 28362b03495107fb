//! Parsed chat intents.
//!
//! Players talk to the game in free text. Rather than comparing raw
//! strings all over the engine, the host (or the engine itself) runs
//! every incoming text through [`Intent::parse`] once and matches on the
//! resulting enum.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// The command that ends a turn, abstains, or cancels a skill.
pub const STOP_COMMAND: &str = "/stop";

/// What a single incoming text means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// `/stop`: end the current turn, abstain, or cancel a skill.
    Stop,

    /// A 1-based number picked from a numbered list.
    SelectIndex(usize),

    /// Ask the host to start the game (lobby command).
    AdminStart,

    /// Ask the host to end the game (lobby command).
    AdminEnd,

    /// Join the lobby.
    Join,

    /// Leave the lobby.
    Leave,

    /// List the players currently in the lobby or game.
    ListPlayers,

    /// Anything else: ordinary chat.
    Text(String),
}

impl Intent {
    /// Interprets a raw text. Never fails: unknown input is [`Intent::Text`].
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        if text == STOP_COMMAND {
            return Self::Stop;
        }
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            // Digits that overflow `usize` are still a (useless) selection,
            // not chat.
            return Self::SelectIndex(text.parse().unwrap_or(usize::MAX));
        }
        match text {
            "start" | "开始游戏" => Self::AdminStart,
            "end" | "结束游戏" => Self::AdminEnd,
            "join" | "加入游戏" => Self::Join,
            "leave" | "退出游戏" => Self::Leave,
            "players" | "当前玩家" => Self::ListPlayers,
            _ => Self::Text(raw.to_owned()),
        }
    }

    /// Returns `true` for [`Intent::Stop`].
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }

    /// Resolves a selection against a list of `len` entries.
    ///
    /// Returns the zero-based position when the intent is a number in
    /// `1..=len`, `None` otherwise.
    pub fn position_in(&self, len: usize) -> Option<usize> {
        match self {
            Self::SelectIndex(n) if (1..=len).contains(n) => Some(n - 1),
            _ => None,
        }
    }

    /// Like [`Intent::position_in`], but reports why the input was rejected.
    pub fn require_position(&self, len: usize) -> Result<usize, ProtocolError> {
        self.position_in(len).ok_or_else(|| {
            ProtocolError::UnexpectedInput(format!(
                "expected a number between 1 and {len}, got {self:?}"
            ))
        })
    }
}

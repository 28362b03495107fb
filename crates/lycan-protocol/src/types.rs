//! Identity and addressing types.
//!
//! Chat platforms identify people and groups with opaque strings. We wrap
//! those strings in newtypes so a `GroupId` can never be passed where a
//! `UserId` is expected, even though both are `String` underneath.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// An opaque identifier for a participant, as issued by the chat platform.
///
/// `#[serde(transparent)]` serializes this as the bare string, so
/// `UserId("1001".into())` becomes `"1001"` in JSON.
///
/// `Ord` is derived because player listings are numbered in user-id
/// order; the numbering must be stable for the whole game.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Parsing rejects blank ids; use this on untrusted input.
impl FromStr for UserId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProtocolError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// An opaque identifier for a chat group (the place a game is played in).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for GroupId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProtocolError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// The destination of an outgoing text.
///
/// A private message goes to one user; a group message is seen by
/// everyone in the group the game runs in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum Target {
    /// A private conversation with a single user.
    User(UserId),

    /// A group conversation.
    Group(GroupId),
}

impl Target {
    /// Returns `true` for private targets.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Group(id) => write!(f, "group:{}", id.as_str()),
        }
    }
}

impl From<UserId> for Target {
    fn from(value: UserId) -> Self {
        Self::User(value)
    }
}

impl From<GroupId> for Target {
    fn from(value: GroupId) -> Self {
        Self::Group(value)
    }
}

//! Transport abstraction layer for Lycan.
//!
//! The engine never talks to a chat platform directly. It sends through
//! the [`ChatTransport`] trait and reads player input from an
//! [`InputStore`], which the host's inbound message path feeds.
//!
//! # Feature Flags
//!
//! - `memory` (default): [`MemoryTransport`], a channel-backed transport
//!   for tests and local demos.

mod error;
mod mailbox;
#[cfg(feature = "memory")]
mod memory;

pub use error::{MailboxError, TransportError};
pub use mailbox::{InputStore, Mailbox, MailboxKey};
#[cfg(feature = "memory")]
pub use memory::{MemoryTransport, Outgoing};

use std::fmt;

use async_trait::async_trait;
use lycan_protocol::Target;

/// Opaque handle for a delivered message, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Platform-assigned message id.
    pub message_id: u64,
    /// Where the message went.
    pub target: Target,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}@{}", self.message_id, self.target)
    }
}

/// Sends text to users and groups.
///
/// Implemented by the host's chat adapter. The trait is object safe
/// (via `async_trait`) so the engine can hold an `Arc<dyn ChatTransport>`
/// without becoming generic over the adapter.
#[async_trait]
pub trait ChatTransport: Send + Sync + 'static {
    /// Delivers `text` to `target`.
    async fn send_text(
        &self,
        target: &Target,
        text: &str,
    ) -> Result<Receipt, TransportError>;
}

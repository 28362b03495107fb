/// Errors that can occur while sending text to the chat platform.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport was shut down; nothing more can be sent.
    #[error("transport closed")]
    Closed,

    /// The platform rejected or failed to deliver a message.
    #[error("send to {target} failed: {reason}")]
    SendFailed {
        target: lycan_protocol::Target,
        reason: String,
    },
}

/// Errors returned by [`InputStore`](crate::InputStore) readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MailboxError {
    /// The mailbox was closed while (or before) waiting.
    #[error("mailbox closed")]
    Closed,
}

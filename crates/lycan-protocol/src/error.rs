//! Error types for the protocol layer.

/// Errors that can occur while interpreting protocol values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// An identifier was empty or contained only whitespace.
    ///
    /// Chat platforms never hand out blank ids, so seeing one means the
    /// host layer built the value incorrectly.
    #[error("identifier must not be empty")]
    EmptyId,

    /// The text was expected to carry a specific intent but did not.
    #[error("unexpected input: {0}")]
    UnexpectedInput(String),
}

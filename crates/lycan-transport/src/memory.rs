//! In-process transport backed by a Tokio channel.
//!
//! Every sent text is pushed onto an unbounded channel as an
//! [`Outgoing`] record. Tests read the channel to assert on what the
//! game said; the terminal demo prints it.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lycan_protocol::Target;
use tokio::sync::mpsc;

use crate::{ChatTransport, Receipt, TransportError};

/// A message the game sent, as captured by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub receipt: Receipt,
    pub target: Target,
    pub text: String,
}

/// A [`ChatTransport`] that delivers into an mpsc channel.
#[derive(Debug)]
pub struct MemoryTransport {
    tx: mpsc::UnboundedSender<Outgoing>,
    next_id: AtomicU64,
}

impl MemoryTransport {
    /// Creates the transport and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outgoing>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            tx,
            next_id: AtomicU64::new(1),
        };
        (transport, rx)
    }
}

#[async_trait]
impl ChatTransport for MemoryTransport {
    async fn send_text(
        &self,
        target: &Target,
        text: &str,
    ) -> Result<Receipt, TransportError> {
        let receipt = Receipt {
            message_id: self.next_id.fetch_add(1, Ordering::Relaxed),
            target: target.clone(),
        };
        self.tx
            .send(Outgoing {
                receipt: receipt.clone(),
                target: target.clone(),
                text: text.to_owned(),
            })
            .map_err(|_| TransportError::Closed)?;
        tracing::trace!(%target, "message sent");
        Ok(receipt)
    }
}

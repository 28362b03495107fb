//! Player input mailboxes.
//!
//! Every blocking "wait for this player's next message" in the engine
//! goes through an [`InputStore`]:
//!
//! - A mailbox holds **at most one waiting reader**. Further readers
//!   queue behind it (FIFO, via an async lock) and take their turn once
//!   the current one receives or gives up.
//! - A message is handed straight to the waiting reader. If nobody is
//!   waiting, the message is **dropped, not queued**, so chat sent
//!   between prompts never answers the next one.
//! - [`InputStore::close`] wakes every reader with
//!   [`MailboxError::Closed`].
//!
//! Messages are keyed by user and scope: `None` for the private
//! conversation with the bot, `Some(group)` for what the user says in a
//! group.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lycan_protocol::{GroupId, UserId};
use tokio::sync::oneshot;

use crate::MailboxError;

/// Identifies one mailbox: a user, in a scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailboxKey {
    pub user: UserId,
    /// `None` is the private conversation.
    pub scope: Option<GroupId>,
}

impl MailboxKey {
    /// The private conversation with `user`.
    pub fn private(user: &UserId) -> Self {
        Self {
            user: user.clone(),
            scope: None,
        }
    }

    /// What `user` says in `group`.
    pub fn in_group(user: &UserId, group: &GroupId) -> Self {
        Self {
            user: user.clone(),
            scope: Some(group.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    waiter: Option<oneshot::Sender<String>>,
    closed: bool,
}

/// Locks a std mutex, ignoring poisoning. Critical sections in this
/// module never panic while holding the lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A single-pending-value handoff for one (user, scope) pair.
#[derive(Debug, Default)]
pub struct Mailbox {
    /// Serializes readers. Held for the whole wait.
    reader: tokio::sync::Mutex<()>,
    slot: Mutex<Slot>,
}

/// Clears a reader's registration when its wait ends for any reason,
/// including cancellation.
struct Registration<'a> {
    slot: &'a Mutex<Slot>,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        lock(self.slot).waiter = None;
    }
}

impl Mailbox {
    /// Creates an open, empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for the next message.
    ///
    /// Cancel-safe: dropping the future unregisters the reader, and a
    /// message that raced with the drop is discarded like any other
    /// unread message.
    pub async fn receive(&self) -> Result<String, MailboxError> {
        let _turn = self.reader.lock().await;

        let rx = {
            let mut slot = lock(&self.slot);
            if slot.closed {
                return Err(MailboxError::Closed);
            }
            let (tx, rx) = oneshot::channel();
            slot.waiter = Some(tx);
            rx
        };
        // Declared after `_turn` so it drops first: the registration is
        // gone before the next reader can get in.
        let _registration = Registration { slot: &self.slot };

        rx.await.map_err(|_| MailboxError::Closed)
    }

    /// Hands `text` to the waiting reader. Returns `false` (and drops the
    /// text) when nobody is waiting.
    pub fn send(&self, text: String) -> bool {
        let waiter = lock(&self.slot).waiter.take();
        match waiter {
            Some(tx) => tx.send(text).is_ok(),
            None => false,
        }
    }

    /// Returns `true` while a reader is registered.
    pub fn has_reader(&self) -> bool {
        lock(&self.slot)
            .waiter
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Closes the mailbox and wakes the current reader. Queued and future
    /// readers fail immediately.
    pub fn close(&self) {
        let mut slot = lock(&self.slot);
        slot.closed = true;
        // Dropping the sender wakes the reader with `RecvError`.
        slot.waiter = None;
    }

    /// Returns `true` once closed.
    pub fn is_closed(&self) -> bool {
        lock(&self.slot).closed
    }
}

/// All mailboxes of a host, keyed by [`MailboxKey`].
///
/// Shared (`Arc<InputStore>`) between the host's inbound path, which
/// calls [`put`](Self::put), and every running game, which calls
/// [`fetch`](Self::fetch).
#[derive(Debug, Default)]
pub struct InputStore {
    boxes: Mutex<HashMap<MailboxKey, Arc<Mailbox>>>,
    closed: Mutex<bool>,
}

impl InputStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn mailbox(&self, key: MailboxKey) -> Arc<Mailbox> {
        let closed = *lock(&self.closed);
        let mut boxes = lock(&self.boxes);
        Arc::clone(boxes.entry(key).or_insert_with(|| {
            let mailbox = Mailbox::new();
            if closed {
                mailbox.close();
            }
            Arc::new(mailbox)
        }))
    }

    /// Waits for the next text `user` sends in `scope` (`None` = private).
    pub async fn fetch(
        &self,
        user: &UserId,
        scope: Option<&GroupId>,
    ) -> Result<String, MailboxError> {
        let key = MailboxKey {
            user: user.clone(),
            scope: scope.cloned(),
        };
        let mailbox = self.mailbox(key);
        mailbox.receive().await
    }

    /// Delivers a text from `user` in `scope`. Returns `false` when no
    /// reader was waiting and the text was dropped.
    pub fn put(
        &self,
        user: &UserId,
        scope: Option<&GroupId>,
        text: impl Into<String>,
    ) -> bool {
        let key = MailboxKey {
            user: user.clone(),
            scope: scope.cloned(),
        };
        let mailbox = lock(&self.boxes).get(&key).cloned();
        let delivered = mailbox.is_some_and(|mb| mb.send(text.into()));
        if !delivered {
            tracing::debug!(%user, ?scope, "no reader waiting, input dropped");
        }
        delivered
    }

    /// Returns `true` while someone waits on `user`'s mailbox in `scope`.
    pub fn is_waiting(&self, user: &UserId, scope: Option<&GroupId>) -> bool {
        let key = MailboxKey {
            user: user.clone(),
            scope: scope.cloned(),
        };
        lock(&self.boxes)
            .get(&key)
            .is_some_and(|mb| mb.has_reader())
    }

    /// Closes every mailbox, present and future.
    pub fn close(&self) {
        *lock(&self.closed) = true;
        for mailbox in lock(&self.boxes).values() {
            mailbox.close();
        }
        tracing::info!("input store closed");
    }
}

//! Integration tests for the input store and the in-memory transport.

use std::sync::Arc;
use std::time::Duration;

use lycan_protocol::{GroupId, Target, UserId};
use lycan_transport::{ChatTransport, InputStore, MailboxError, MemoryTransport};

// =========================================================================
// Helpers
// =========================================================================

fn alice() -> UserId {
    UserId::from("alice")
}

/// Yields until a reader is registered, then delivers.
async fn put_when_waiting(
    store: &InputStore,
    user: &UserId,
    scope: Option<&GroupId>,
    text: &str,
) {
    for _ in 0..1_000 {
        if store.is_waiting(user, scope) {
            assert!(store.put(user, scope, text));
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("no reader registered for {user}");
}

// =========================================================================
// InputStore
// =========================================================================

#[tokio::test]
async fn test_put_without_reader_is_dropped() {
    let store = InputStore::new();
    assert!(!store.put(&alice(), None, "hello"));
    assert!(!store.is_waiting(&alice(), None));
}

#[tokio::test]
async fn test_fetch_receives_put_while_waiting() {
    let store = InputStore::new();
    let user = alice();
    let (received, ()) = tokio::join!(
        store.fetch(&user, None),
        put_when_waiting(&store, &user, None, "3"),
    );
    assert_eq!(received, Ok("3".to_string()));
    assert!(!store.is_waiting(&user, None), "reader unregistered after receive");
}

#[tokio::test]
async fn test_dropped_message_does_not_reach_next_reader() {
    let store = InputStore::new();
    let user = alice();
    assert!(!store.put(&user, None, "early"));

    let (received, ()) = tokio::join!(
        store.fetch(&user, None),
        put_when_waiting(&store, &user, None, "late"),
    );
    assert_eq!(received.unwrap(), "late");
}

#[tokio::test]
async fn test_scopes_are_separate_mailboxes() {
    let store = InputStore::new();
    let user = alice();
    let group = GroupId::from("g1");

    let (received, ()) = tokio::join!(
        store.fetch(&user, Some(&group)),
        async {
            // Wait for the group reader, then check the private scope is
            // still unattended.
            put_when_waiting(&store, &user, Some(&group), "/stop").await;
        },
    );
    assert_eq!(received.unwrap(), "/stop");
    assert!(!store.put(&user, None, "private"));
}

#[tokio::test]
async fn test_second_reader_waits_for_first() {
    let store = InputStore::new();
    let user = alice();

    let (first, second, ()) = tokio::join!(
        store.fetch(&user, None),
        store.fetch(&user, None),
        async {
            put_when_waiting(&store, &user, None, "one").await;
            put_when_waiting(&store, &user, None, "two").await;
        },
    );
    assert_eq!(first.unwrap(), "one");
    assert_eq!(second.unwrap(), "two");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_reader_unregisters() {
    let store = InputStore::new();
    let user = alice();

    let timed_out =
        tokio::time::timeout(Duration::from_secs(1), store.fetch(&user, None)).await;
    assert!(timed_out.is_err());
    assert!(!store.is_waiting(&user, None));
    assert!(!store.put(&user, None, "nobody home"));
}

#[tokio::test]
async fn test_close_wakes_waiting_reader() {
    let store = Arc::new(InputStore::new());
    let user = alice();

    let (received, ()) = tokio::join!(store.fetch(&user, None), async {
        while !store.is_waiting(&user, None) {
            tokio::task::yield_now().await;
        }
        store.close();
    });
    assert_eq!(received, Err(MailboxError::Closed));

    // Mailboxes created after closing are closed too.
    let other = UserId::from("bob");
    assert_eq!(store.fetch(&other, None).await, Err(MailboxError::Closed));
}

// =========================================================================
// MemoryTransport
// =========================================================================

#[tokio::test]
async fn test_memory_transport_records_messages_in_order() {
    let (transport, mut rx) = MemoryTransport::new();
    let group = Target::Group(GroupId::from("g"));
    let user = Target::User(alice());

    let first = transport.send_text(&group, "night falls").await.unwrap();
    let second = transport.send_text(&user, "your role").await.unwrap();
    assert!(second.message_id > first.message_id);

    let a = rx.recv().await.unwrap();
    let b = rx.recv().await.unwrap();
    assert_eq!((a.target, a.text.as_str()), (group, "night falls"));
    assert_eq!((b.target, b.text.as_str()), (user, "your role"));
}

#[tokio::test]
async fn test_memory_transport_fails_after_receiver_dropped() {
    let (transport, rx) = MemoryTransport::new();
    drop(rx);
    let result = transport
        .send_text(&Target::User(alice()), "anyone?")
        .await;
    assert!(result.is_err());
}

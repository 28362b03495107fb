//! Fixtures for unit tests that drive the engine directly.

use std::sync::Arc;

use lycan_protocol::{GroupId, UserId};
use lycan_transport::{InputStore, MemoryTransport, Outgoing};
use tokio::sync::mpsc;

use crate::engine::Engine;
use crate::{GameConfig, Player, PlayerIndex, Role};

pub(crate) struct Table {
    pub(crate) engine: Engine,
    pub(crate) inputs: Arc<InputStore>,
    pub(crate) outbox: mpsc::UnboundedReceiver<Outgoing>,
}

/// Seats `roles` as users `u1..` named `P1..`, in that order.
pub(crate) fn table(roles: &[Role]) -> Table {
    let (transport, outbox) = MemoryTransport::new();
    let inputs = Arc::new(InputStore::new());
    let players: Vec<Player> = roles
        .iter()
        .enumerate()
        .map(|(i, &role)| {
            Player::new(
                PlayerIndex(i),
                UserId::from(format!("u{}", i + 1)),
                format!("P{}", i + 1),
                role,
            )
        })
        .collect();
    let order = players.iter().map(Player::index).collect();
    let engine = Engine::new(
        GroupId::from("g"),
        GameConfig::default(),
        Arc::new(transport),
        Arc::clone(&inputs),
        players,
        order,
    );
    Table {
        engine,
        inputs,
        outbox,
    }
}

impl Table {
    pub(crate) fn group(&self) -> GroupId {
        self.engine.group.clone()
    }

    /// Every text sent so far.
    pub(crate) fn sent(&mut self) -> Vec<String> {
        let mut texts = Vec::new();
        while let Ok(out) = self.outbox.try_recv() {
            texts.push(out.text);
        }
        texts
    }
}

/// Delivers `text` from `user` as soon as the engine waits for it.
pub(crate) async fn say(inputs: &InputStore, user: &str, scope: Option<&GroupId>, text: &str) {
    let user = UserId::from(user);
    for _ in 0..10_000 {
        if inputs.is_waiting(&user, scope) && inputs.put(&user, scope, text) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("{user} was never asked for input ({text:?})");
}

//! The dead players' side channel.
//!
//! Once a player departs, every private message they send is relayed to
//! the other departed players, never to the living. One listener per
//! player feeds a single relay through an mpsc channel; the whole thing
//! stops when the game-finished signal fires.

use std::time::Duration;

use futures_util::future::join_all;
use lycan_sync::RateLimiter;
use tokio::sync::mpsc;

use crate::engine::Engine;
use crate::{GameError, Player, PlayerIndex};

/// Rolling window for the per-player rate limit.
const RATE_WINDOW: Duration = Duration::from_secs(60);

const RELAY_CHANNEL_SIZE: usize = 32;

pub(crate) struct DeadChannel<'a> {
    engine: &'a Engine,
}

impl<'a> DeadChannel<'a> {
    pub(crate) fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Runs until the game finishes.
    pub(crate) async fn run(self) {
        let (tx, rx) = mpsc::channel(RELAY_CHANNEL_SIZE);
        let listeners = join_all(
            self.engine
                .all()
                .iter()
                .map(|player| self.listen(player, tx.clone())),
        );
        drop(tx);

        tokio::select! {
            () = self.engine.finished.wait() => {}
            _ = async { tokio::join!(listeners, self.relay(rx)) } => {}
        }
        tracing::debug!(group = %self.engine.group, "dead channel closed");
    }

    /// Waits for `player` to depart, then forwards their private messages.
    async fn listen(&self, player: &'a Player, tx: mpsc::Sender<(PlayerIndex, String)>) {
        player.departed().wait().await;
        if let Err(err) = self.welcome(player).await {
            tracing::warn!(player = %player.user_id(), error = %err, "dead channel welcome failed");
        }

        let mut limiter = RateLimiter::new(self.engine.config.dead_channel_rate_limit, RATE_WINDOW);
        loop {
            let Ok(text) = self.engine.receive_private(player).await else {
                return;
            };
            if !limiter.try_acquire() {
                tracing::debug!(player = %player.user_id(), "dead channel message rate limited");
                self.notify(player, "You are sending messages too fast; that one was dropped.")
                    .await;
                continue;
            }
            if tx.send((player.index(), text)).await.is_err() {
                return;
            }
        }
    }

    async fn welcome(&self, player: &Player) -> Result<(), GameError> {
        self.engine
            .tell(
                player,
                "You are dead. Anything you send me privately now goes to the \
                 other dead players.",
            )
            .await?;
        let others = self.engine.all().departed().exclude(player);
        if !others.is_empty() {
            self.engine
                .tell_all(&others, &format!("{player} has joined the dead."))
                .await?;
        }
        Ok(())
    }

    async fn relay(&self, mut rx: mpsc::Receiver<(PlayerIndex, String)>) {
        while let Some((index, text)) = rx.recv().await {
            let sender = self.engine.player(index);
            let audience = self.engine.all().departed().exclude(index);
            if audience.is_empty() {
                continue;
            }
            let line = format!("[{sender}] {text}");
            if let Err(err) = audience.broadcast(self.engine.transport(), &line).await {
                tracing::warn!(player = %sender.user_id(), error = %err, "dead channel relay failed");
                self.notify(sender, &format!("Your message could not be delivered: {err}"))
                    .await;
            }
        }
    }

    /// Best-effort private notice; a failure is only logged.
    async fn notify(&self, player: &Player, text: &str) {
        if let Err(err) = self.engine.tell(player, text).await {
            tracing::warn!(player = %player.user_id(), error = %err, "dead channel notice failed");
        }
    }
}

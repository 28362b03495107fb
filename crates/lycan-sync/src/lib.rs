//! Concurrency primitives for Lycan.
//!
//! A game is many small conversations running at once: one per living
//! player during a night, one for the dead channel, one for the round
//! engine itself. This crate holds the pieces that coordinate them:
//!
//! - [`Signal`]: a single-fire event ("this player has died",
//!   "the game is over", "terminate now").
//! - [`CompletionBarrier`]: a countdown that fires a [`Signal`] once
//!   every participant has arrived (the witch waits on this for the
//!   werewolves).
//! - [`RateLimiter`]: a rolling-window admission counter.
//! - [`bounded`] / [`random_delay`]: timeout and jitter helpers.
//!
//! # Cancellation
//!
//! Everything here is cancel-safe: dropping a future that waits on a
//! signal or barrier has no side effects, and a [`Ticket`] arrives at its
//! barrier even when the task holding it is cancelled.

mod barrier;
mod limiter;
mod signal;
mod timing;

pub use barrier::{CompletionBarrier, Ticket};
pub use limiter::RateLimiter;
pub use signal::Signal;
pub use timing::{bounded, random_delay};

//! Integration tests for the concurrency primitives.
//!
//! Timer-driven tests run with `start_paused = true`, so sleeps resolve
//! as soon as every task is idle and nothing depends on wall-clock speed.

use std::time::Duration;

use lycan_sync::{bounded, random_delay, CompletionBarrier, RateLimiter, Signal};

// =========================================================================
// Signal
// =========================================================================

#[test]
fn test_signal_set_only_flips_once() {
    let signal = Signal::new();
    assert!(!signal.is_set());
    assert!(signal.set());
    assert!(!signal.set(), "second set must report no change");
    assert!(signal.is_set());
}

#[tokio::test]
async fn test_signal_wait_after_set_returns_immediately() {
    let signal = Signal::new();
    signal.set();
    signal.wait().await;
}

#[tokio::test(start_paused = true)]
async fn test_signal_wakes_every_waiter() {
    let signal = Signal::new();
    let setter = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        signal.set();
    };
    tokio::join!(signal.wait(), signal.wait(), setter);
    assert!(signal.is_set());
}

// =========================================================================
// CompletionBarrier
// =========================================================================

#[test]
fn test_barrier_with_zero_participants_is_complete() {
    let barrier = CompletionBarrier::new(0);
    assert!(barrier.is_complete());
    barrier.arrive();
    assert_eq!(barrier.remaining(), 0);
}

#[test]
fn test_barrier_tickets_count_down_on_drop() {
    let barrier = CompletionBarrier::new(2);
    let first = barrier.ticket();
    let second = barrier.ticket();
    drop(first);
    assert!(!barrier.is_complete());
    assert_eq!(barrier.remaining(), 1);
    drop(second);
    assert!(barrier.is_complete());
}

#[test]
fn test_barrier_extra_arrivals_do_not_underflow() {
    let barrier = CompletionBarrier::new(1);
    barrier.arrive();
    barrier.arrive();
    assert_eq!(barrier.remaining(), 0);
    assert!(barrier.is_complete());
}

#[tokio::test(start_paused = true)]
async fn test_barrier_waiter_released_by_cancelled_participant() {
    let barrier = CompletionBarrier::new(1);

    let participant = async {
        let _ticket = barrier.ticket();
        // Never finishes on its own; the timeout cancels it.
        std::future::pending::<()>().await;
    };
    let outcome = bounded("participant", Duration::from_secs(5), participant);

    let (_, ()) = tokio::join!(outcome, barrier.wait());
    assert!(barrier.is_complete());
}

// =========================================================================
// RateLimiter
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_rate_limiter_admits_limit_per_window() {
    let mut limiter = RateLimiter::new(3, Duration::from_secs(60));
    assert!(limiter.try_acquire());
    assert!(limiter.try_acquire());
    assert!(limiter.try_acquire());
    assert!(!limiter.try_acquire(), "fourth message inside the window");
    assert_eq!(limiter.in_window(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limiter_window_rolls() {
    let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
    assert!(limiter.try_acquire());
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(limiter.try_acquire());
    assert!(!limiter.try_acquire());

    // The first admission expires at t=60, the second at t=90.
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(limiter.try_acquire());
    assert!(!limiter.try_acquire());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(limiter.try_acquire());
}

#[tokio::test(start_paused = true)]
async fn test_rate_limiter_zero_limit_rejects_everything() {
    let mut limiter = RateLimiter::new(0, Duration::from_secs(60));
    assert!(!limiter.try_acquire());
}

// =========================================================================
// Timing helpers
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_bounded_returns_output_before_deadline() {
    let out = bounded("quick", Duration::from_secs(10), async { 7 }).await;
    assert_eq!(out, Some(7));
}

#[tokio::test(start_paused = true)]
async fn test_bounded_returns_none_after_deadline() {
    let slow = async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        1
    };
    assert_eq!(bounded("slow", Duration::from_secs(10), slow).await, None);
}

#[test]
fn test_random_delay_stays_in_range() {
    let range = Duration::from_secs(5)..=Duration::from_secs(20);
    for _ in 0..100 {
        let d = random_delay(range.clone());
        assert!(d >= Duration::from_secs(5) && d <= Duration::from_secs(20));
    }
}

#[test]
fn test_random_delay_degenerate_range() {
    let d = random_delay(Duration::ZERO..=Duration::ZERO);
    assert_eq!(d, Duration::ZERO);
}

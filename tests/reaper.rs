//! Background reaper behaviour under paused Tokio time.

use std::time::Duration;

mod common;

// common::tracker uses a 30s stale timeout and a 10s sweep interval.

#[tokio::test(start_paused = true)]
async fn silent_polled_stream_is_reaped() {
    let tracker = common::tracker(2);
    tracker.heartbeat("10.0.0.1", "token-abc").unwrap();

    tokio::time::sleep(Duration::from_secs(45)).await;

    assert_eq!(tracker.active_count(), 0);
    tracker.stop();
}

#[tokio::test(start_paused = true)]
async fn persistent_stream_is_never_reaped() {
    let tracker = common::tracker(2);
    tracker.reserve("10.0.0.1", "100").unwrap();

    tokio::time::sleep(Duration::from_secs(600)).await;

    assert_eq!(tracker.active_count(), 1);
    tracker.stop();
}

#[tokio::test(start_paused = true)]
async fn heartbeats_keep_polled_stream_alive() {
    let tracker = common::tracker(2);
    for _ in 0..10 {
        tracker.heartbeat("10.0.0.1", "token-abc").unwrap();
        tokio::time::sleep(Duration::from_secs(20)).await;
    }
    assert_eq!(tracker.active_count(), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(tracker.active_count(), 0);
    tracker.stop();
}

#[tokio::test(start_paused = true)]
async fn reaping_frees_capacity_for_new_clients() {
    let tracker = common::tracker(1);
    tracker.heartbeat("10.0.0.1", "token-abc").unwrap();
    assert!(tracker.reserve("10.0.0.2", "200").is_err());

    tokio::time::sleep(Duration::from_secs(45)).await;

    tracker.reserve("10.0.0.2", "200").unwrap();
    assert_eq!(tracker.active_count(), 1);
    tracker.stop();
}

#[tokio::test(start_paused = true)]
async fn no_sweeps_after_stop() {
    let tracker = common::tracker(2);
    tracker.heartbeat("10.0.0.1", "token-abc").unwrap();

    tracker.stop();
    tracker.stop();
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(tracker.active_count(), 1);
    // Explicit sweeps still work; only the background task is gone.
    assert_eq!(tracker.sweep_stale(tokio::time::Instant::now()), 1);
}

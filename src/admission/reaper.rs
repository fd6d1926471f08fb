//! Background sweep of silent polled connections.
//!
//! # Responsibilities
//! - Wake every `sweep_interval` and call `AdmissionTracker::sweep_stale`
//! - Exit on the tracker's stop signal or once the tracker is dropped

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::admission::tracker::AdmissionTracker;

pub(crate) struct Reaper {
    tracker: Weak<AdmissionTracker>,
    interval: Duration,
    stop: watch::Receiver<bool>,
}

impl Reaper {
    pub(crate) fn new(
        tracker: Weak<AdmissionTracker>,
        interval: Duration,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            tracker,
            interval,
            stop,
        }
    }

    pub(crate) async fn run(mut self) {
        tracing::debug!(interval = ?self.interval, "Reaper starting");

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // Stop wins over a due tick; no sweep runs after stop() is seen.
            tokio::select! {
                biased;
                _ = self.stop.changed() => break,
                _ = ticker.tick() => {
                    let Some(tracker) = self.tracker.upgrade() else {
                        break;
                    };
                    tracker.sweep_stale(Instant::now());
                }
            }
        }

        tracing::info!("Reaper exited");
    }
}

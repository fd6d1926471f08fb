//! Shared active-stream set and the admission operations on it.
//!
//! # Responsibilities
//! - Admit persistent streams (`reserve`) and polled streams (`heartbeat`)
//! - Release persistent streams on disconnect
//! - Reap polled streams that stopped heartbeating
//! - Report occupancy for diagnostics and metrics

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::admission::guard::StreamGuard;
use crate::admission::key::{ConnectionEntry, ConnectionKey, ConnectionKind};
use crate::admission::policy::{Admission, AdmissionPolicy, AtCapacity};
use crate::admission::reaper::Reaper;
use crate::config::AdmissionConfig;
use crate::observability::metrics;

type ActiveSet = HashMap<ConnectionKey, ConnectionEntry>;

/// Shortest reaper period; a zero interval is raised to this.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Point-in-time view of one tracked stream.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSnapshot {
    pub client: String,
    pub stream: String,
    pub kind: ConnectionKind,
    pub age_secs: u64,
    pub idle_secs: u64,
}

/// Tracks open streams and enforces the provider's connection limit.
///
/// Construct once per limiter and share the returned `Arc` with every
/// connection handler. All mutations take the write lock for the whole
/// check-then-insert sequence, so two racing admissions can never both
/// squeeze past the limit.
pub struct AdmissionTracker {
    active: RwLock<ActiveSet>,
    policy: AdmissionPolicy,
    stale_timeout: Duration,
    stop_tx: watch::Sender<bool>,
}

impl AdmissionTracker {
    /// Create a tracker and start its reaper on the current Tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn new(config: &AdmissionConfig) -> Arc<Self> {
        let (stop_tx, stop_rx) = watch::channel(false);
        let tracker = Arc::new(Self {
            active: RwLock::new(HashMap::new()),
            policy: AdmissionPolicy::new(config.max_connections),
            stale_timeout: config.stale_timeout(),
            stop_tx,
        });

        let mut sweep_interval = config.sweep_interval();
        if sweep_interval < MIN_SWEEP_INTERVAL {
            tracing::warn!(
                configured = ?sweep_interval,
                using = ?MIN_SWEEP_INTERVAL,
                "Sweep interval too short, clamping"
            );
            sweep_interval = MIN_SWEEP_INTERVAL;
        }

        let reaper = Reaper::new(Arc::downgrade(&tracker), sweep_interval, stop_rx);
        tokio::spawn(reaper.run());

        tracing::info!(
            max_connections = config.max_connections,
            stale_timeout_secs = config.stale_timeout_secs,
            sweep_interval_secs = config.sweep_interval_secs,
            "Admission tracker started"
        );
        tracker
    }

    /// Admit a long-lived stream that will be released explicitly.
    ///
    /// Reserving a key that is already tracked is a no-op and never fails.
    pub fn reserve(&self, client: &str, stream: &str) -> Result<(), AtCapacity> {
        self.admit(ConnectionKey::new(client, stream), ConnectionKind::Persistent)
            .map(|_| ())
    }

    /// Like [`reserve`](Self::reserve), but releases the key when the
    /// returned guard is dropped.
    ///
    /// Only the guard that actually inserted the key releases it. A guard
    /// taken on a key that was already tracked does not own the slot, so
    /// dropping it leaves the other holder's stream counted.
    pub fn reserve_guard(
        self: &Arc<Self>,
        client: &str,
        stream: &str,
    ) -> Result<StreamGuard, AtCapacity> {
        let key = ConnectionKey::new(client, stream);
        let inserted = self.admit(key.clone(), ConnectionKind::Persistent)?;
        Ok(StreamGuard::new(Arc::clone(self), key, inserted))
    }

    /// Register or refresh a polled stream.
    ///
    /// A tracked key only has its `last_seen` bumped; the limit is not
    /// re-checked, so an admitted stream is never rejected mid-playback.
    pub fn heartbeat(&self, client: &str, stream: &str) -> Result<(), AtCapacity> {
        self.admit(ConnectionKey::new(client, stream), ConnectionKind::Polled)
            .map(|_| ())
    }

    /// Free the slot held by a stream. Unknown keys are ignored.
    pub fn release(&self, client: &str, stream: &str) {
        self.release_key(&ConnectionKey::new(client, stream));
    }

    pub(crate) fn release_key(&self, key: &ConnectionKey) {
        let mut active = self.write();
        if active.remove(key).is_some() {
            let count = active.len();
            metrics::set_active_connections(count);
            drop(active);
            tracing::info!(
                connection = %key,
                active = count,
                limit = self.policy.max_connections(),
                "Connection released"
            );
            metrics::record_released();
        }
    }

    /// Number of tracked streams.
    pub fn active_count(&self) -> usize {
        self.read().len()
    }

    /// Configured limit; 0 means unlimited.
    pub fn max_connections(&self) -> usize {
        self.policy.max_connections()
    }

    /// List every tracked stream, ordered by client then stream.
    pub fn snapshot(&self) -> Vec<ConnectionSnapshot> {
        let now = Instant::now();
        let mut entries: Vec<ConnectionSnapshot> = self
            .read()
            .iter()
            .map(|(key, entry)| ConnectionSnapshot {
                client: key.client().to_string(),
                stream: key.stream().to_string(),
                kind: entry.kind,
                age_secs: now.saturating_duration_since(entry.created_at).as_secs(),
                idle_secs: now.saturating_duration_since(entry.last_seen).as_secs(),
            })
            .collect();
        entries.sort_by(|a, b| (&a.client, &a.stream).cmp(&(&b.client, &b.stream)));
        entries
    }

    /// Remove polled entries idle for longer than the stale timeout.
    ///
    /// This is one reaper pass; returns how many entries were dropped.
    pub fn sweep_stale(&self, now: Instant) -> usize {
        let mut active = self.write();
        let before = active.len();
        let limit = self.policy.max_connections();
        let stale_timeout = self.stale_timeout;

        active.retain(|key, entry| {
            if entry.is_stale(now, stale_timeout) {
                tracing::info!(connection = %key, limit, "Polled connection expired");
                false
            } else {
                true
            }
        });

        let removed = before - active.len();
        if removed > 0 {
            let count = active.len();
            metrics::set_active_connections(count);
            drop(active);
            tracing::debug!(removed, active = count, "Stale sweep finished");
            metrics::record_reaped(removed);
        }
        removed
    }

    /// Stop the background reaper. Safe to call more than once.
    pub fn stop(&self) {
        if !self.stop_tx.send_replace(true) {
            tracing::info!("Stopping stale connection reaper");
        }
    }

    /// Whether [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Returns whether a new entry was inserted.
    fn admit(&self, key: ConnectionKey, kind: ConnectionKind) -> Result<bool, AtCapacity> {
        let now = Instant::now();
        let mut active = self.write();

        if let Some(entry) = active.get_mut(&key) {
            if kind == ConnectionKind::Polled {
                entry.last_seen = now;
            }
            return Ok(false);
        }

        let admission = self
            .policy
            .check(active.len(), || active.keys().any(|k| k.client() == key.client()));

        let admission = match admission {
            Ok(admission) => admission,
            Err(err) => {
                drop(active);
                tracing::warn!(
                    connection = %key,
                    kind = kind.as_str(),
                    active = err.active,
                    limit = err.limit,
                    "Connection rejected: at capacity"
                );
                metrics::record_rejected(kind);
                return Err(err);
            }
        };

        active.insert(key.clone(), ConnectionEntry::new(kind, now));
        let count = active.len();
        // Gauge updates stay under the lock so they land in mutation order.
        metrics::set_active_connections(count);
        drop(active);

        let grace = admission == Admission::Grace;
        if grace {
            tracing::info!(
                connection = %key,
                kind = kind.as_str(),
                active = count,
                limit = self.policy.max_connections(),
                "Connection admitted via grace slot"
            );
        } else {
            tracing::info!(
                connection = %key,
                kind = kind.as_str(),
                active = count,
                limit = self.policy.max_connections(),
                "Connection admitted"
            );
        }
        metrics::record_admitted(kind, grace);
        Ok(true)
    }

    // The set holds plain data; a panicked writer cannot leave it half-updated.
    fn read(&self) -> RwLockReadGuard<'_, ActiveSet> {
        self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ActiveSet> {
        self.active.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AdmissionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionTracker")
            .field("active", &self.active_count())
            .field("max_connections", &self.policy.max_connections())
            .field("stale_timeout", &self.stale_timeout)
            .finish()
    }
}

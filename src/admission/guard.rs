//! RAII handle for a reserved persistent stream.

use std::sync::Arc;

use crate::admission::key::ConnectionKey;
use crate::admission::tracker::AdmissionTracker;

/// Releases its stream's slot when dropped.
///
/// Handlers that hold one for the lifetime of a response cannot leak a slot
/// on early return or panic. A guard taken on a key that was already
/// tracked does not own the slot and releases nothing.
#[derive(Debug)]
pub struct StreamGuard {
    tracker: Arc<AdmissionTracker>,
    key: ConnectionKey,
    owns_slot: bool,
}

impl StreamGuard {
    pub(crate) fn new(tracker: Arc<AdmissionTracker>, key: ConnectionKey, owns_slot: bool) -> Self {
        Self {
            tracker,
            key,
            owns_slot,
        }
    }

    /// Whether dropping this guard frees the slot.
    pub fn owns_slot(&self) -> bool {
        self.owns_slot
    }

    /// The key this guard holds.
    pub fn key(&self) -> &ConnectionKey {
        &self.key
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if self.owns_slot {
            self.tracker.release_key(&self.key);
        }
    }
}

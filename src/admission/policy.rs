//! Admission policy: hard cap plus the channel-switch grace slot.

use thiserror::Error;

/// Returned when a new stream cannot be admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("max connections reached ({active}/{limit})")]
pub struct AtCapacity {
    /// Active connections at the moment of rejection.
    pub active: usize,
    /// Configured maximum.
    pub limit: usize,
}

/// Outcome of a successful admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Below the limit, or the limiter is unlimited.
    Within,
    /// Admitted through the single grace slot.
    Grace,
}

/// Decides whether one more connection fits.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionPolicy {
    max_connections: usize,
}

impl AdmissionPolicy {
    /// `max_connections == 0` disables the limit.
    pub fn new(max_connections: usize) -> Self {
        Self { max_connections }
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_connections == 0
    }

    /// Run the admission check for a new key.
    ///
    /// `client_present` is only evaluated when the active set sits exactly at
    /// the limit. A client that already holds a stream may then go one over,
    /// which bridges a channel switch where the old stream has not been
    /// released yet. Once that slot is taken, `active > limit` and every
    /// further request is rejected, from any client.
    pub fn check(
        &self,
        active: usize,
        client_present: impl FnOnce() -> bool,
    ) -> Result<Admission, AtCapacity> {
        let limit = self.max_connections;
        if limit == 0 || active < limit {
            return Ok(Admission::Within);
        }
        if active == limit && client_present() {
            return Ok(Admission::Grace);
        }
        Err(AtCapacity { active, limit })
    }
}

//! Connection identity and per-entry metadata.

use std::fmt;

use serde::Serialize;
use tokio::time::Instant;

/// Composite identity of one tracked stream.
///
/// Both components are kept as separate fields, so a separator character in
/// either of them can never make two different pairs collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    client: String,
    stream: String,
}

impl ConnectionKey {
    pub fn new(client: impl Into<String>, stream: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            stream: stream.into(),
        }
    }

    /// Originating client identity (usually the source address).
    pub fn client(&self) -> &str {
        &self.client
    }

    /// Stream or session identity on that client.
    pub fn stream(&self) -> &str {
        &self.stream
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.client, self.stream)
    }
}

/// How a tracked connection leaves the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// Long-lived stream; removed only by an explicit release.
    Persistent,
    /// Segmented delivery; kept alive by heartbeats and reaped when silent.
    Polled,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Persistent => "persistent",
            ConnectionKind::Polled => "polled",
        }
    }
}

/// Metadata for one admitted connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionEntry {
    pub kind: ConnectionKind,
    pub created_at: Instant,
    pub last_seen: Instant,
}

impl ConnectionEntry {
    pub fn new(kind: ConnectionKind, now: Instant) -> Self {
        Self {
            kind,
            created_at: now,
            last_seen: now,
        }
    }

    /// Whether the reaper should drop this entry at `now`.
    pub fn is_stale(&self, now: Instant, stale_timeout: std::time::Duration) -> bool {
        self.kind == ConnectionKind::Polled
            && now.saturating_duration_since(self.last_seen) > stale_timeout
    }
}

//! Stream admission subsystem.
//!
//! # Data Flow
//! ```text
//! Persistent stream connects
//!     → tracker.rs reserve() (admission check under write lock)
//!     → stream served until disconnect
//!     → tracker.rs release()
//!
//! Polled (segmented) stream requests a chunk
//!     → tracker.rs heartbeat() (admit once, then refresh last_seen)
//!     → reaper.rs sweeps entries silent past stale_timeout
//! ```
//!
//! # Design Decisions
//! - One lock guards the whole active set; check and insert are atomic
//! - Grace admission only at exactly `active == limit`, so the set never
//!   grows past `limit + 1`
//! - Persistent entries are never reaped; the caller owns their release

pub mod guard;
pub mod key;
pub mod policy;
pub mod reaper;
pub mod tracker;

pub use guard::StreamGuard;
pub use key::{ConnectionEntry, ConnectionKey, ConnectionKind};
pub use policy::{AdmissionPolicy, AtCapacity};
pub use tracker::{AdmissionTracker, ConnectionSnapshot};

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! admission tracker / control API produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every admission event, keyed by connection
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

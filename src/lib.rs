//! Stream admission control for a media-streaming proxy.
//!
//! Decides whether a new client stream may open under the provider's
//! concurrent-connection limit and tracks open streams so capacity is
//! reclaimed, either on explicit release or when a polled stream goes quiet.

pub mod admission;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use admission::{AdmissionTracker, AtCapacity, StreamGuard};
pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

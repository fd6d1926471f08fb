//! HTTP control API subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy connection handler / operator
//!     → server.rs (Axum router, request ID, tracing, timeout)
//!     → handlers.rs (map path to tracker operation)
//!     → AdmissionTracker
//!     → 204 / 429 / JSON diagnostics
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};

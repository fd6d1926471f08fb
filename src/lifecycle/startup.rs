//! Startup orchestration.
//!
//! Initializes subsystems in dependency order, serves the control API, and
//! tears everything down again on a shutdown signal.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinError;

use crate::admission::AdmissionTracker;
use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Run the service until SIGINT/SIGTERM.
pub async fn run(config: ServiceConfig) -> Result<(), std::io::Error> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let tracker = AdmissionTracker::new(&config.admission);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for control requests");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, Arc::clone(&tracker));
    let mut server_task = tokio::spawn(server.run(listener, shutdown.signal()));

    let served = tokio::select! {
        _ = signals::wait_for_shutdown_signal() => {
            shutdown.trigger();
            flatten(server_task.await)
        }
        result = &mut server_task => flatten(result),
    };

    tracker.stop();
    tracing::info!(remaining = tracker.active_count(), "Admission tracker stopped");
    served
}

fn flatten(result: Result<std::io::Result<()>, JoinError>) -> std::io::Result<()> {
    result.map_err(std::io::Error::other)?
}

//! Stream admission service.
//!
//! ```text
//!   proxy connect / disconnect / segment poll
//!            │
//!            ▼
//!   ┌──────────────────┐     ┌───────────────────────┐
//!   │  control API     │────▶│  AdmissionTracker     │
//!   │  (axum)          │     │  limit + grace slot   │
//!   └──────────────────┘     └──────────┬────────────┘
//!                                       │ every sweep_interval
//!                                       ▼
//!                            ┌───────────────────────┐
//!                            │  reaper (stale polled)│
//!                            └───────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use stream_admission::config::{load_config, ServiceConfig};
use stream_admission::lifecycle::startup;
use stream_admission::observability::logging;

#[derive(Parser)]
#[command(name = "stream-admission")]
#[command(about = "Connection admission control for a streaming proxy", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override admission.max_connections (0 = unlimited).
    #[arg(short, long)]
    max_connections: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(max) = cli.max_connections {
        config.admission.max_connections = max;
    }

    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        max_connections = config.admission.max_connections,
        stale_timeout_secs = config.admission.stale_timeout_secs,
        sweep_interval_secs = config.admission.sweep_interval_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

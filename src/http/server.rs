//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the control API handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve until the shutdown signal, draining in-flight requests

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admission::AdmissionTracker;
use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::lifecycle::ShutdownSignal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<AdmissionTracker>,
}

/// HTTP server for the control API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ServiceConfig, tracker: Arc<AdmissionTracker>) -> Self {
        let router = Self::build_router(config, AppState { tracker });
        Self { router }
    }

    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/v1/status", get(handlers::get_status))
            .route("/v1/streams", get(handlers::list_streams))
            .route(
                "/v1/streams/{client}/{stream}",
                post(handlers::reserve).delete(handlers::release),
            )
            .route(
                "/v1/streams/{client}/{stream}/heartbeat",
                post(handlers::heartbeat),
            )
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

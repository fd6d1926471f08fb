//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use stream_admission::config::{AdmissionConfig, ServiceConfig};
use stream_admission::{AdmissionTracker, HttpServer, Shutdown};
use tokio::net::TcpListener;

/// Tracker whose reaper will not fire during a test unless time is advanced.
#[allow(dead_code)]
pub fn tracker(max_connections: usize) -> Arc<AdmissionTracker> {
    AdmissionTracker::new(&AdmissionConfig {
        max_connections,
        stale_timeout_secs: 30,
        sweep_interval_secs: 10,
    })
}

/// A running control API on an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub tracker: Arc<AdmissionTracker>,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
        self.tracker.stop();
    }
}

#[allow(dead_code)]
pub async fn start_server(max_connections: usize) -> TestServer {
    let mut config = ServiceConfig::default();
    config.admission.max_connections = max_connections;

    let tracker = AdmissionTracker::new(&config.admission);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, Arc::clone(&tracker));
    let server_shutdown = shutdown.signal();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        tracker,
        shutdown,
    }
}

//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use crisis_corner::config::AppConfig;
use crisis_corner::lifecycle::startup::{start, Running, StartupError};
use crisis_corner::lifecycle::Shutdown;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub running: Running,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}/api/request", self.addr)
    }

    /// Trigger shutdown and wait for the server to drain and close its store.
    pub async fn stop(self) -> Result<(), StartupError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.running.task)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
    }
}

/// Default config bound to `127.0.0.1:0`.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config
}

pub async fn start_server(config: AppConfig) -> TestServer {
    let shutdown = Shutdown::new();
    let running = start(config, &shutdown).await.expect("server failed to start");
    TestServer {
        addr: running.local_addr,
        shutdown,
        running,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

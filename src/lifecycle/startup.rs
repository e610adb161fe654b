//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the document store
//! - Build the Request Service and HTTP server
//! - Bind the listener and begin accepting traffic
//! - Close the store once the server has drained
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::requests::{RequestService, ServiceSettings};
use crate::store::{StoreError, StoreHandle};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// A started server.
pub struct Running {
    /// Address actually bound (resolves port 0).
    pub local_addr: SocketAddr,
    /// Completes after the server drains and the store is closed.
    pub task: JoinHandle<Result<(), StartupError>>,
}

/// Start the service described by `config`, stopping when `shutdown` fires.
pub async fn start(config: AppConfig, shutdown: &Shutdown) -> Result<Running, StartupError> {
    let store = StoreHandle::connect(&config.store).await?;
    let service = RequestService::new(store.clone(), ServiceSettings::from(&config));

    tracing::info!(
        page_size = config.pagination.page_size,
        request_timeout_secs = config.timeouts.request_secs,
        "Request service ready"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(&config, service);
    let server_shutdown = shutdown.subscribe();

    let task = tokio::spawn(async move {
        let served = server.run(listener, server_shutdown).await;
        let closed = store.close().await;
        served?;
        closed?;
        Ok(())
    });

    Ok(Running { local_addr, task })
}

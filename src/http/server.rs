//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use axum::{
    body::Body,
    http::Request,
    routing::get,
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handlers::{create_request, health, list_requests, update_request_status};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::shutdown::triggered;
use crate::requests::RequestService;

/// Path serving the three request operations.
pub const REQUEST_PATH: &str = "/api/request";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: RequestService,
}

/// HTTP server for the request API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &AppConfig, service: RequestService) -> Self {
        let router = build_router(config, AppState { service });
        Self { router }
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(triggered(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &AppConfig, state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id(request.headers()),
            )
        }))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        // Timeout must sit innermost: it needs a `Default` response body.
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

    Router::new()
        .route(
            REQUEST_PATH,
            get(list_requests)
                .put(create_request)
                .patch(update_request_status),
        )
        .route("/health", get(health))
        .with_state(state)
        .layer(middleware)
}

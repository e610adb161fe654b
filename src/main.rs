//! Crisis Corner item-request service.
//!
//! Tracks requests for relief items through a small JSON API.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client                 ┌───────────────────────────────────────────┐
//!   ───────────────────────┼─▶ http (axum router + tower middleware)   │
//!     GET/PUT/PATCH        │        │                                   │
//!     /api/request         │        ▼                                   │
//!                          │   requests (RequestService: validate,      │
//!                          │             paginate, stamp timestamps)    │
//!                          │        │                                   │
//!                          │        ▼                                   │
//!                          │   store (StoreHandle → DocumentStore)      │
//!                          │                                            │
//!                          │   config · lifecycle · observability       │
//!                          └───────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use crisis_corner::config::loader::{finalize, read_config};
use crisis_corner::config::AppConfig;
use crisis_corner::lifecycle::{self, signals, Shutdown};
use crisis_corner::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "crisis-corner")]
#[command(about = "Item request tracking API", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `store.uri`.
    #[arg(long, env = "CRISIS_CORNER_STORE_URI")]
    store_uri: Option<String>,

    /// MongoDB connection string; `--store-uri` wins when both are set.
    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    mongo_uri: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(uri) = args.store_uri.or(args.mongo_uri) {
        config.store.uri = uri;
    }
    let config = finalize(config)?;

    logging::init_logging(&config.observability);
    tracing::info!("crisis-corner v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let running = lifecycle::start(config, &shutdown).await?;
    running.task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! Tasklist task server -- in-memory REST backend for the tasklist client.
//!
//! An axum HTTP server exposing task CRUD over JSON. Tasks live in memory
//! for the lifetime of the process.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:8000
//! cargo run --bin tasklist-server
//!
//! # Run on custom address
//! cargo run --bin tasklist-server -- --bind 127.0.0.1:8080
//!
//! # Or via environment variable
//! TASKLIST_SERVER_ADDR=127.0.0.1:8080 cargo run --bin tasklist-server
//! ```

use std::sync::Arc;

use clap::Parser;
use tasklist_server::config::{ServerCliArgs, ServerConfig};
use tasklist_server::server::{self, ServerState};
use tasklist_server::store::TaskStore;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting tasklist server");

    let state = Arc::new(ServerState::with_config(
        config.max_body_size,
        TaskStore::new(),
    ));

    match server::start_server_with_state(config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "task server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "task server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start task server");
            std::process::exit(1);
        }
    }
}

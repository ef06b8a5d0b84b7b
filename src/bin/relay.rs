//! Relay server binary - performs provider calls on behalf of clients
//!
//! Usage:
//!   cargo run --bin relay
//!
//! Optional environment variables:
//! - RELAY_HOST (defaults to 127.0.0.1)
//! - RELAY_PORT (defaults to 8787)
//! - RELAY_SECRET (require this value in the X-Relay-Secret header)
//! - GEMINI_API_URL, OPENAI_API_URL, OPENROUTER_API_URL

use anyhow::Result;
use highlight_translator::config::Config;
use highlight_translator::relay::{serve, RelayState};
use highlight_translator::ProviderRouter;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("highlight_translator=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    if config.relay_secret.is_none() {
        warn!("RELAY_SECRET not set, relay accepts requests from any local client");
    }

    let router = ProviderRouter::new(reqwest::Client::new(), config.endpoints());
    let state = Arc::new(RelayState::new(router, config.relay_secret.clone()));

    let addr: SocketAddr = format!("{}:{}", config.relay_host, config.relay_port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    serve(listener, state, shutdown_signal()).await?;
    info!("Relay shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C (or SIGTERM on unix)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

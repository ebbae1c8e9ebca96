//! rounder — binary entrypoint
//! Reads configuration, boots the Axum server and drains it (bounded) on SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rounder::api;
use rounder::config::AppConfig;
use rounder::ingest::providers::HttpTransport;
use rounder::ingest::Transport;
use rounder::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rounder=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before tracing so RUST_LOG from it applies.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env().context("loading configuration")?;
    tracing::info!(config = ?cfg, "App initializing");

    cfg.prepare_storage()
        .await
        .with_context(|| format!("creating ingest dir {}", cfg.ingest_dir.display()))?;

    let transport: Arc<dyn Transport> = match cfg.provider_timeout {
        Some(t) => Arc::new(HttpTransport::with_timeout(t).context("building provider client")?),
        None => Arc::new(HttpTransport::new()),
    };

    let metrics = Metrics::init().context("installing prometheus recorder")?;
    let app = api::create_router(api::AppState::new(&cfg, transport)).merge(metrics.router());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(address = %addr, "Running server");

    api::serve(listener, app, wait_for_signal(), api::SHUTDOWN_GRACE)
        .await
        .context("serving http")?;

    tracing::info!("shutting down");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
    }
}

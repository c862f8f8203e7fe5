//! # Menu API server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Guest phone ──► HTTP (8080) ──► routes ──► resort-db ──► SQLite        │
//! │  Staff board ──┘                   │                                    │
//! │                                    ▼                                    │
//! │                               resort-core                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use menu_api::{serve, ApiConfig, AppState};
use resort_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting menu API server...");

    let config = ApiConfig::load().context("loading configuration")?;
    info!(
        addr = %config.socket_addr(),
        db = %config.database_path.display(),
        tax_bps = config.tax_rate.bps(),
        order_currency = %config.order_currency,
        exchange_rate = config.exchange_rate.get(),
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(config.database_path.clone()).max_connections(config.db_max_connections),
    )
    .await
    .context("opening database")?;

    let state = AppState::new(db.clone(), config.order_pricing());

    let listener = TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("binding {}", config.socket_addr()))?;
    info!(addr = %config.socket_addr(), "Server running");

    serve(listener, state).await.context("serving HTTP")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

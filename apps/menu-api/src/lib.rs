//! # menu-api: HTTP Surface for the Resort Menu
//!
//! JSON API behind the customer menu site and the staff order board.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Menu API Routes                                │
//! │                                                                         │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌──────────────────┐  │
//! │  │  menu              │  │  orders            │  │  health          │  │
//! │  │                    │  │                    │  │                  │  │
//! │  │ • items ?q &cat    │  │ • POST create      │  │ • GET status     │  │
//! │  │ • categories       │  │ • GET one / recent │  │                  │  │
//! │  │ • priced           │  │ • PUT status       │  │                  │  │
//! │  └────────────────────┘  └────────────────────┘  └──────────────────┘  │
//! │  ┌────────────────────┐                                                │
//! │  │  promotions        │      CorsLayer::permissive + TraceLayer        │
//! │  └────────────────────┘                                                │
//! │                                                                         │
//! │              AppState { Database, TaxRate }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables, see [`config::ApiConfig`]:
//! - `MENU_API_BIND`, `MENU_API_PORT` - listen address
//! - `DATABASE_PATH` - SQLite file
//! - `MENU_TAX_RATE_BPS` - order tax in basis points
//! - `MENU_DB_MAX_CONNECTIONS` - pool size

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::build_app;
pub use state::AppState;

/// Serves the API until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let app = build_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

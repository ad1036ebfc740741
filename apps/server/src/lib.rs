//! # uriage-server
//!
//! JSON API over the sales ledger.
//!
//! ## Module Organization
//! ```text
//! uriage_server/
//! ├── lib.rs          ◄─── You are here (serve & tracing setup)
//! ├── config.rs       ◄─── ServerConfig: defaults, uriage.toml, URIAGE_* env
//! ├── error.rs        ◄─── ApiError / ErrorCode → HTTP status + JSON
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState, bootstrap with offline fallback
//! │   └── settings.rs ◄─── settings.toml (company info, catalog)
//! └── routes/
//!     ├── mod.rs      ◄─── Router
//!     ├── health.rs   ├── sales.rs     ├── reports.rs
//!     ├── invoices.rs ├── company.rs   ├── products.rs
//!     └── notify.rs
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use state::AppState;

pub use routes::router;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=uriage=trace` - Show trace for uriage crates only
/// - Default: `info,uriage=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,uriage=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

/// Loads configuration, builds state and serves until Ctrl-C.
///
/// ## Startup Sequence
/// 1. Load `ServerConfig` (file + environment)
/// 2. Bootstrap `AppState` (database or offline demo store, settings, notifier)
/// 3. Bind and serve the router
/// 4. On shutdown, close the database pool
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::load()?;
    info!(
        bind_addr = %config.bind_addr,
        notify_on_save = config.notify_on_save,
        default_tax_rate = %config.default_tax_rate,
        "Configuration loaded"
    );

    let state = Arc::new(AppState::bootstrap(&config).await?);
    info!(
        connected = state.connected(),
        backend = state.store().backend(),
        "State initialized"
    );

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

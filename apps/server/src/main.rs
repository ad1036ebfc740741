//! # Uriage Server Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Web UI ──► HTTP/JSON ──► uriage-server ──┬──► SQLite (uriage.db)       │
//! │                                           ├──► settings.toml            │
//! │                                           └──► broadcast endpoint       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs so tests can build the same router.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    uriage_server::init_tracing();
    tracing::info!("Starting uriage server");

    uriage_server::run().await
}

//! # uriage-db: Record Store for Uriage
//!
//! This crate persists sales records. The rest of the workspace only sees
//! the [`SalesStore`] trait; whether records live in SQLite or in memory is
//! decided once at startup.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Uriage Data Flow                                 │
//! │                                                                         │
//! │  POST /api/sales  ──► DailyEntry::into_record (uriage-core)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     uriage-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │   SalesStore    │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ SqliteSalesStore│   │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ MemorySalesStore│   │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └─────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir, or URIAGE_DB_PATH)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use uriage_db::{Database, DbConfig, SalesStore};
//!
//! let db = Database::new(DbConfig::new("uriage.db")).await?;
//! let id = db.sales().append(&record).await?;
//! let records = db.sales().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};
pub use repository::memory::MemorySalesStore;
pub use repository::sale::SqliteSalesStore;
pub use repository::{SalesStore, SortDirection, SortField};

//! # Database Handle
//!
//! Opens the SQLite file that backs the sales ledger and hands out stores
//! sharing one pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("…/uriage.db")          DbConfig::in_memory()            │
//! │        │                                      │                         │
//! │        └──────────────┬───────────────────────┘                         │
//! │                       ▼                                                 │
//! │  Database::new(config)                                                  │
//! │    • parent directory created if missing                                │
//! │    • journal_mode = WAL, synchronous = NORMAL                           │
//! │    • foreign_keys = ON (line items cascade with their sale)             │
//! │    • busy_timeout so a second writer waits instead of failing           │
//! │    • embedded migrations                                                │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │  db.sales() ──► SqliteSalesStore   (clone of the pool, cheap)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With WAL a report query and a save can run at the same time.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::sale::SqliteSalesStore;

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private to the pool; vanishes when the pool closes.
    Memory,
}

/// How to open the database.
///
/// ## Example
/// ```rust,ignore
/// let db = Database::new(
///     DbConfig::new(data_dir.join("uriage.db")).busy_timeout(Duration::from_secs(10)),
/// )
/// .await?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Default: 4. A single shop writes a handful of records a day; the
    /// extra connections serve concurrent report reads.
    pub max_connections: u32,

    /// How long to wait for a free pool connection. Default: 10 seconds
    pub acquire_timeout: Duration,

    /// How long SQLite waits on a locked database before `SQLITE_BUSY`.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// A file database. The file and its directory are created on open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 4,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// A throwaway database for tests.
    ///
    /// Every connection to `:memory:` would see its own empty database, so
    /// the pool is pinned to exactly one connection that never expires.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            ..DbConfig::new(PathBuf::new())
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.location {
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            // WAL does not apply to in-memory databases
            DbLocation::Memory => SqliteConnectOptions::new().in_memory(true),
        };

        options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
    }
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            debug!(dir = %parent.display(), "Creating database directory");
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::Unavailable(format!("cannot create {}: {}", parent.display(), e))
            })
        }
        _ => Ok(()),
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open database. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) and migrates the database.
    ///
    /// ## Errors
    /// - [`DbError::Unavailable`] when the file can't be opened or its
    ///   directory can't be created
    /// - [`DbError::Migration`] when the schema can't be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);

        match &config.location {
            DbLocation::File(path) => {
                info!(path = %path.display(), "Opening sales database");
                ensure_parent_dir(path)?;
            }
            DbLocation::Memory => {
                debug!("Opening in-memory sales database");
                pool_options = pool_options
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None);
            }
        }

        let pool = pool_options
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?;

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        } else {
            warn!("Migrations skipped; schema may be out of date");
        }

        Ok(db)
    }

    /// Applies any embedded migration not yet recorded in the database.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        let (known, applied) = migrations::migration_status(&self.pool).await?;
        info!(known, applied, "Schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Store for sales records, sharing this pool.
    pub fn sales(&self) -> SqliteSalesStore {
        SqliteSalesStore::new(self.pool.clone())
    }

    /// Closes every connection. Stores obtained earlier start failing.
    pub async fn close(&self) {
        info!("Closing sales database");
        self.pool.close().await;
    }

    /// True if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

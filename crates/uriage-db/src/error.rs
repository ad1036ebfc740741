//! # Store Errors
//!
//! Everything a [`SalesStore`](crate::SalesStore) call can fail with.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / MigrateError / std::io::Error                            │
//! │       │  classified by sqlx ErrorKind, not by message text              │
//! │       ▼                                                                 │
//! │  DbError ──► ApiError in the server                                     │
//! │             DuplicateId → 409, everything else → 500                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The database could not be reached at all.
    ///
    /// ## When This Occurs
    /// - The configured path is a directory or is not writable
    /// - The pool was closed during shutdown
    /// - Every connection stayed busy past the acquire timeout
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    /// A sales record with this id is already stored.
    #[error("{table} already holds id '{id}'")]
    DuplicateId { table: String, id: String },

    /// Foreign key, NOT NULL or CHECK constraint rejected a write.
    #[error("Constraint rejected write: {0}")]
    Constraint(String),

    #[error("Query failed: {0}")]
    Query(String),

    /// A stored row no longer decodes into a domain value.
    ///
    /// ## When This Occurs
    /// - `tax_rate` holds something other than 8 or 10
    /// - Rows edited by hand outside the application
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow { table: String, reason: String },
}

impl DbError {
    pub fn duplicate(table: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::DuplicateId {
            table: table.into(),
            id: id.into(),
        }
    }

    pub fn corrupt(table: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::CorruptRow {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// True when the store itself is down rather than one request being bad.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DbError::Unavailable(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                // The caller knows the id and fills it in
                ErrorKind::UniqueViolation => {
                    DbError::duplicate(db_err.table().unwrap_or("sales"), "")
                }
                ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => DbError::Constraint(db_err.message().to_string()),
                _ => DbError::Query(db_err.message().to_string()),
            },
            sqlx::Error::PoolTimedOut => {
                DbError::Unavailable("timed out waiting for a connection".to_string())
            }
            sqlx::Error::PoolClosed => DbError::Unavailable("pool is closed".to_string()),
            sqlx::Error::Io(e) => DbError::Unavailable(e.to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

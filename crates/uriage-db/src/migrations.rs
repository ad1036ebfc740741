//! Schema migrations, compiled into the binary from `migrations/sqlite/`.
//!
//! Files are applied in name order (`001_initial_schema.sql`, …) and
//! recorded in `_sqlx_migrations`. Published files are immutable; schema
//! changes go in a new numbered file.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

static SCHEMA: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the schema up to date. Already applied files are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = SCHEMA.migrations.len(), "Applying pending migrations");
    SCHEMA.run(pool).await?;
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((SCHEMA.migrations.len(), usize::try_from(applied).unwrap_or(0)))
}

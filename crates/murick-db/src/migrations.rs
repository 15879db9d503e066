//! # Database Migrations
//!
//! The schema is one table, `shop_collections`, holding each shop's
//! inventory, sales and header as JSON arrays. Migration files live in
//! `migrations/sqlite/` at the workspace root and are embedded at compile
//! time; sqlx records applied versions and checksums in `_sqlx_migrations`.
//!
//! New schema changes get a new numbered file. Applied files are never
//! edited: the checksum mismatch would stop every shop database from
//! opening.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations, each in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (total, applied) = migration_status(pool).await?;
    if applied < total {
        info!(pending = total - applied, "Applying shop database migrations");
    }

    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Returns `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 =
        match sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
        {
            Ok(count) => count,
            // Table is missing until the first run
            Err(sqlx::Error::Database(e)) if e.message().contains("no such table") => {
                debug!("No migrations applied yet");
                0
            }
            Err(e) => return Err(e.into()),
        };

    Ok((total, applied as usize))
}

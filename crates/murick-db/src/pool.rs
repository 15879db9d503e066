//! # Database Pool Management
//!
//! Opens the shop database and hands out the two ways of working with it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Opening a shop database                         │
//! │                                                                         │
//! │  DbConfig::new(path)          DbConfig::in_memory()                     │
//! │       │                              │                                  │
//! │       └──────────────┬───────────────┘                                  │
//! │                      ▼                                                  │
//! │  connect_options()   WAL, synchronous=NORMAL, busy_timeout              │
//! │                      ▼                                                  │
//! │  Database::new()     SqlitePool + migrations                            │
//! │                      │                                                  │
//! │          ┌───────────┴────────────┐                                     │
//! │          ▼                        ▼                                     │
//! │  db.collections()          db.shops()                                   │
//! │  raw JSON per shop         locked read-modify-write                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! WAL lets reports read while a sale is being written. Writers queue on
//! SQLite's lock for up to `busy_timeout` before failing.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::collection::CollectionStore;
use crate::repository::shop::{ShopLocks, ShopService};

// =============================================================================
// Configuration
// =============================================================================

/// Where the shop data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private database that disappears with the pool. Tests only.
    Memory,
}

/// Pool settings.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/murick/murick.db").max_connections(5);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Default: 5
    pub max_connections: u32,

    /// How long to wait for a free pooled connection. Default: 30 seconds
    pub acquire_timeout: Duration,

    /// How long a writer waits for another connection's write lock.
    /// Default: 10 seconds
    pub busy_timeout: Duration,

    /// Apply pending migrations when connecting. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// The file is created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(10),
            run_migrations: true,
        }
    }

    /// Every pooled connection to `:memory:` would open its own empty
    /// database, so the pool is pinned to a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(1),
            run_migrations: true,
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

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                // May lose the last commit on power loss, never corrupts.
                .synchronous(SqliteSynchronous::Normal),
            DbLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
        };
        Ok(options.foreign_keys(true).busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to one shop database.
///
/// Clones share the pool and the per-shop locks, so writes to a shop are
/// serialized across every clone in the process.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    locks: ShopLocks,
}

impl Database {
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = ?config.location, "Opening shop database");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);
        if config.location == DbLocation::Memory {
            // The data lives only as long as its single connection.
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            max_connections = config.max_connections,
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            "Pool ready"
        );

        let db = Database {
            pool,
            locks: ShopLocks::default(),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Raw collection access without the shop lock.
    ///
    /// Use [`Database::shops`] for anything that changes stock or sales.
    pub fn collections(&self) -> CollectionStore {
        CollectionStore::new(self.pool.clone())
    }

    /// Locked, transactional shop operations.
    pub fn shops(&self) -> ShopService {
        ShopService::new(self.pool.clone(), self.locks.clone())
    }

    /// Later operations fail with `ConnectionFailed`.
    pub async fn close(&self) {
        debug!("Closing shop database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shop_collections")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_health_check_needs_schema() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        assert!(!db.health_check().await);

        db.run_migrations().await.unwrap();
        assert!(db.health_check().await);

        db.close().await;
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_file_database_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(db.health_check().await);
        db.close().await;

        assert!(path.exists());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/murick.db")
            .max_connections(10)
            .busy_timeout(Duration::from_millis(250))
            .run_migrations(false);

        assert_eq!(config.location, DbLocation::File(PathBuf::from("/tmp/murick.db")));
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.run_migrations);

        let memory = DbConfig::in_memory();
        assert_eq!(memory.location, DbLocation::Memory);
        assert_eq!(memory.max_connections, 1);
    }
}

//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError ← storage failure, safe to retry                               │
//! │       │                                                                 │
//! │       │      CoreError ← domain failure, fix the input                  │
//! │       │          │                                                      │
//! │       ▼          ▼                                                      │
//! │  ServiceError (ShopService results)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in the CLI) ← error code + exit status                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use murick_core::CoreError;
use thiserror::Error;

/// Storage failures.
///
/// Any of these leaves the shop exactly as it was before the call: the
/// transaction that hit it is rolled back.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Runtime SQL error, including CHECK constraint failures.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin or commit failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A stored payload is not a JSON array, or a record failed to encode.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Another connection held the write lock past `busy_timeout`.
    #[error("Database is locked by another writer")]
    Busy,

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// SQLITE_BUSY and its extended codes (BUSY_RECOVERY, BUSY_SNAPSHOT, ...).
fn is_busy_code(code: &str) -> bool {
    code.parse::<i32>().map(|c| c & 0xff == 5).unwrap_or(false)
}

/// ```text
/// Database(BUSY)  → Busy
/// Database(other) → QueryFailed
/// PoolTimedOut    → PoolExhausted
/// PoolClosed      → ConnectionFailed
/// other           → Internal
/// ```
///
/// Missing shops and SKUs are domain outcomes, so even `RowNotFound` is a
/// storage fault here.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.code().map(|c| is_busy_code(&c)).unwrap_or(false) {
                    DbError::Busy
                } else {
                    DbError::QueryFailed(db_err.message().to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Service Errors
// =============================================================================

/// Outcome of a [`ShopService`](crate::ShopService) call.
///
/// `Domain` means the request itself was rejected and retrying it unchanged
/// will fail again. `Storage` means the store failed and nothing was
/// persisted.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl ServiceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Storage(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

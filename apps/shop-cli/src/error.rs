//! # CLI Error Type
//!
//! Every command returns `Result<_, ApiError>`. The error carries a
//! machine-readable code, which also picks the process exit status.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  ValidationError / CoreError ──┐                                        │
//! │  ReportError ──────────────────┤                                        │
//! │  DbError / ServiceError ───────┼──► ApiError { code, message }          │
//! │  ConfigError ──────────────────┤         │                              │
//! │  csv / io ─────────────────────┘         ├──► stderr (or JSON on stdout)│
//! │                                          └──► exit status               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--json` a failure is printed as:
//! ```json
//! { "code": "INSUFFICIENT_STOCK", "message": "Insufficient stock for ..." }
//! ```

use murick_core::{CoreError, ReportError, ValidationError};
use murick_db::{DbError, ServiceError};
use serde::Serialize;
use std::process::ExitCode;

use crate::state::ConfigError;

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Operator input or stored data failed validation.
    ValidationError,

    /// SKU, sale or export data does not exist.
    NotFound,

    InsufficientStock,

    /// The database failed; the operation may be retried.
    StorageError,

    Internal,
}

impl ErrorCode {
    /// Process exit status for this code. Zero is reserved for success.
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::InsufficientStock => 4,
            ErrorCode::StorageError => 5,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_status())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database transaction failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored data could not be encoded: {}", e);
                ApiError::new(ErrorCode::StorageError, "Stored data is unreadable")
            }
            DbError::PoolExhausted | DbError::Busy => {
                ApiError::new(ErrorCode::StorageError, "Database is busy, try again")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SkuNotFound(id) => ApiError::not_found("Battery", &id),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Storage(e) => e.into(),
        }
    }
}

/// An empty export is reported like a missing record.
impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::new(ErrorCode::NotFound, err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::internal(format!("CSV export failed: {}", err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::internal(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("JSON output failed: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type CliResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_codes() {
        let err: ApiError = CoreError::SkuNotFound("abc".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Battery not found: abc");

        let err: ApiError = ServiceError::Domain(CoreError::InsufficientStock {
            sku: "abc".to_string(),
            available: 1,
            requested: 2,
        })
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err: ApiError = ValidationError::Required {
            field: "brand".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_storage_and_export_codes() {
        let err: ApiError = ServiceError::Storage(DbError::PoolExhausted).into();
        assert_eq!(err.code, ErrorCode::StorageError);

        let err: ApiError = DbError::Internal("no rows returned".to_string()).into();
        assert_eq!(err.code, ErrorCode::StorageError);

        let err: ApiError = ReportError::NothingToExport("sales").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "No sales data to export");
    }

    #[test]
    fn test_exit_statuses_are_distinct() {
        let codes = [
            ErrorCode::ValidationError,
            ErrorCode::NotFound,
            ErrorCode::InsufficientStock,
            ErrorCode::StorageError,
            ErrorCode::Internal,
        ];
        let mut statuses: Vec<u8> = codes.iter().map(ErrorCode::exit_status).collect();
        statuses.sort_unstable();
        statuses.dedup();
        assert_eq!(statuses.len(), codes.len());
        assert!(!statuses.contains(&0));
    }

    #[test]
    fn test_json_shape() {
        let err = ApiError::not_found("Sale", "s1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Sale not found: s1");
    }
}

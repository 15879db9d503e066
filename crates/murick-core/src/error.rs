//! # Error Types
//!
//! Domain-specific error types for murick-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  murick-core errors (this file)                                         │
//! │  ├── CoreError        - Ledger / sales rule violations                  │
//! │  └── ValidationError  - Input and stored-record validation failures     │
//! │                                                                         │
//! │  murick-db errors (separate crate)                                      │
//! │  ├── DbError          - Storage failures ("try again")                  │
//! │  └── ServiceError     - Domain(CoreError) | Storage(DbError)            │
//! │                                                                         │
//! │  CLI errors (in app)                                                    │
//! │  └── ApiError         - What the operator sees, plus an exit code       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant carries enough context (SKU id, field name) to render a
//! message without looking anything else up.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the ledger and the sales recorder.
///
/// Operations that return one of these have not mutated anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Input is malformed or out of range. Fix the input and retry.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The referenced battery SKU does not exist (never added, or removed).
    #[error("Battery not found: {0}")]
    SkuNotFound(String),

    /// Not enough stock to complete the sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Record sale (qty: 3)
    ///      │
    ///      ▼
    /// Check stock: available=2
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "…", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// CLI shows: "Insufficient stock for …: available 2, requested 3"
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Also used when a persisted record fails to parse at the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// An amount derived from the input does not fit in paisa.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Unparseable number or identifier.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A stored record could not be decoded into its typed shape.
    #[error("malformed {collection} record at index {index}: {reason}")]
    MalformedRecord {
        collection: String,
        index: usize,
        reason: String,
    },

    /// Two stored records share the same id.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn negative(field: &str) -> Self {
        ValidationError::Negative {
            field: field.to_string(),
        }
    }

    pub(crate) fn too_large(field: &str) -> Self {
        ValidationError::TooLarge {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "a1".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for a1: available 2, requested 3"
        );

        let err = CoreError::SkuNotFound("missing".to_string());
        assert_eq!(err.to_string(), "Battery not found: missing");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("brand").to_string(),
            "brand is required"
        );
        assert_eq!(
            ValidationError::negative("purchase_price").to_string(),
            "purchase_price must not be negative"
        );
        assert_eq!(
            ValidationError::too_large("total_amount").to_string(),
            "total_amount is too large"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("sold_by").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

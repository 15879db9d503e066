//! # Validation Module
//!
//! Input validation and parsing for the battery shop.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                    │
//! │  ├── Argument presence and primitive types                              │
//! │  └── parse_money / parse_quantity on raw form text                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Ledger / Sales (this crate)                                   │
//! │  └── THIS MODULE: required text, non-negative amounts                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage boundary                                              │
//! │  └── ShopContext::from_records re-validates every stored record         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use murick_core::validation::{parse_money, parse_quantity};
//!
//! let price = parse_money("selling_price", "Rs 12,500.50").unwrap();
//! assert_eq!(price.paisa(), 1_250_050);
//!
//! assert_eq!(parse_quantity("stock_quantity", "10").unwrap(), 10);
//! assert!(parse_quantity("stock_quantity", "ten").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Money, PAISA_PER_RUPEE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound for free-text fields (brand, model, names, address).
pub const MAX_TEXT_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field and returns it trimmed.
///
/// ## Example
/// ```rust
/// use murick_core::validation::validate_required_text;
///
/// assert_eq!(validate_required_text("brand", "  AGS ").unwrap(), "AGS");
/// assert!(validate_required_text("brand", "   ").is_err());
/// ```
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(value.to_string())
}

/// Normalizes an optional text field: blank becomes `None`.
pub fn normalize_optional_text(
    field: &str,
    value: Option<String>,
) -> ValidationResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => validate_required_text(field, &raw).map(Some),
    }
}

/// Validates a shop id used as a storage key.
///
/// ## Rules
/// - Must not be blank
/// - At most 64 characters
/// - Letters, digits, hyphens and underscores only
pub fn validate_shop_id(shop_id: &str) -> ValidationResult<()> {
    let shop_id = shop_id.trim();

    if shop_id.is_empty() {
        return Err(ValidationError::required("shop_id"));
    }

    if shop_id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "shop_id".to_string(),
            max: 64,
        });
    }

    if !shop_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "shop_id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that a money amount is `>= 0`. Zero is allowed.
pub fn validate_non_negative_money(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::negative(field));
    }
    Ok(())
}

/// Validates that a count (stock, alert threshold) is `>= 0`.
pub fn validate_non_negative_count(field: &str, count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::negative(field));
    }
    Ok(())
}

// =============================================================================
// Parsers
// =============================================================================

/// Parses operator-entered money text into paisa.
///
/// Accepts an optional `Rs` prefix, thousands separators and up to two
/// decimal places. Negative values parse successfully so the caller's
/// range check can report them precisely.
///
/// ## Example
/// ```rust
/// use murick_core::validation::parse_money;
///
/// assert_eq!(parse_money("price", "10000").unwrap().paisa(), 1_000_000);
/// assert_eq!(parse_money("price", "10,000.5").unwrap().paisa(), 1_000_050);
/// assert_eq!(parse_money("price", "-5.25").unwrap().paisa(), -525);
/// assert!(parse_money("price", "12.345").is_err());
/// assert!(parse_money("price", "").is_err());
/// ```
pub fn parse_money(field: &str, input: &str) -> ValidationResult<Money> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let mut text = input.trim();
    if text.is_empty() {
        return Err(ValidationError::required(field));
    }

    let negative = text.starts_with('-');
    if negative {
        text = text[1..].trim_start();
    }
    if let Some(rest) = text.strip_prefix("Rs") {
        text = rest.trim_start_matches('.').trim_start();
    }

    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let (major_text, minor_text) = match cleaned.split_once('.') {
        Some((major, minor)) => (major, minor),
        None => (cleaned.as_str(), ""),
    };

    if major_text.is_empty() && minor_text.is_empty() {
        return Err(invalid("expected a number"));
    }
    if !major_text.chars().all(|c| c.is_ascii_digit())
        || !minor_text.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid("expected a number"));
    }
    if minor_text.len() > 2 {
        return Err(invalid("at most two decimal places"));
    }

    let major: i64 = if major_text.is_empty() {
        0
    } else {
        major_text
            .parse()
            .map_err(|_| invalid("amount is too large"))?
    };
    let minor: i64 = match minor_text.len() {
        0 => 0,
        1 => minor_text.parse::<i64>().map_err(|_| invalid("expected a number"))? * 10,
        _ => minor_text.parse().map_err(|_| invalid("expected a number"))?,
    };

    let amount = major
        .checked_mul(PAISA_PER_RUPEE)
        .and_then(|p| Money::from_paisa(p).checked_add(Money::from_paisa(minor)))
        .ok_or_else(|| invalid("amount is too large"))?;

    Ok(if negative { -amount } else { amount })
}

/// Parses an integer quantity from operator input.
pub fn parse_quantity(field: &str, input: &str) -> ValidationResult<i64> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ValidationError::required(field));
    }
    text.parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected a whole number".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

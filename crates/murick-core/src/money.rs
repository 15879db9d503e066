//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Keeping prices as floats:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing thousands of sales rows drifts by a few paisa.                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paisa (1 rupee = 100 paisa)                      │
//! │    Rs 10,000.00 is stored as 1_000_000                                  │
//! │    Every sum in the analytics engine is exact                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use murick_core::money::Money;
//!
//! let price = Money::from_rupees(10_000);     // Rs 10,000.00
//! let line = price.multiply_quantity(3);      // Rs 30,000.00
//! assert_eq!(line, Money::from_rupees(30_000));
//! assert_eq!(line.to_string(), "Rs 30,000.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Minor units per rupee.
pub const PAISA_PER_RUPEE: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paisa (the smallest PKR unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: profit per unit can be negative when a battery is sold
///   below its purchase price
/// - **Transparent serde**: persisted records carry plain numbers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paisa.
    #[inline]
    pub const fn from_paisa(paisa: i64) -> Self {
        Money(paisa)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ```rust
    /// use murick_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(80).paisa(), 8_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * PAISA_PER_RUPEE)
    }

    /// Creates a Money value from rupees and paisa.
    ///
    /// For negative amounts only the rupee part carries the sign:
    /// `from_rupees_paisa(-5, 50)` is -Rs 5.50.
    #[inline]
    pub const fn from_rupees_paisa(rupees: i64, paisa: i64) -> Self {
        if rupees < 0 {
            Money(rupees * PAISA_PER_RUPEE - paisa)
        } else {
            Money(rupees * PAISA_PER_RUPEE + paisa)
        }
    }

    /// Returns the value in paisa.
    #[inline]
    pub const fn paisa(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / PAISA_PER_RUPEE
    }

    /// Returns the paisa portion (always 0-99).
    #[inline]
    pub const fn paisa_part(&self) -> i64 {
        (self.0 % PAISA_PER_RUPEE).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, clamping at the `i64` range.
    ///
    /// Amounts that reach the ledger or the sales log have already passed
    /// [`Money::checked_multiply_quantity`], so clamping only shows up in
    /// aggregates over many records.
    ///
    /// ## User Workflow
    /// ```text
    /// Battery: AGS 55Ah  Rs 10,000
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Sale total: Rs 30,000
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// `None` when the product does not fit in paisa.
    ///
    /// ```rust
    /// use murick_core::money::Money;
    ///
    /// assert_eq!(
    ///     Money::from_rupees(10_000).checked_multiply_quantity(3),
    ///     Some(Money::from_rupees(30_000))
    /// );
    /// assert_eq!(Money::from_paisa(i64::MAX / 2).checked_multiply_quantity(3), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(paisa) => Some(Money(paisa)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(paisa) => Some(Money(paisa)),
            None => None,
        }
    }

    /// Divides by `divisor`, rounding half away from zero to the nearest paisa.
    ///
    /// Returns zero when `divisor` is zero, so averages over an empty set never
    /// panic.
    ///
    /// ```rust
    /// use murick_core::money::Money;
    ///
    /// assert_eq!(Money::from_paisa(1000).divide_rounded(3).paisa(), 333);
    /// assert_eq!(Money::from_paisa(1001).divide_rounded(2).paisa(), 501);
    /// assert_eq!(Money::from_paisa(500).divide_rounded(0), Money::zero());
    /// ```
    pub fn divide_rounded(&self, divisor: i64) -> Money {
        if divisor == 0 {
            return Money::zero();
        }

        // i128 keeps `2 * remainder` from overflowing near i64::MAX
        let n = self.0 as i128;
        let d = divisor as i128;
        let quotient = n / d;
        let remainder = n % d;

        let rounded = if 2 * remainder.abs() >= d.abs() {
            quotient + n.signum() * d.signum()
        } else {
            quotient
        };

        Money(rounded as i64)
    }

    /// Plain decimal rendering without currency symbol or grouping.
    ///
    /// Used for spreadsheet cells where the consumer parses numbers.
    ///
    /// ```rust
    /// use murick_core::money::Money;
    ///
    /// assert_eq!(Money::from_paisa(1_000_050).to_plain_string(), "10000.50");
    /// assert_eq!(Money::from_paisa(-550).to_plain_string(), "-5.50");
    /// ```
    pub fn to_plain_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}.{:02}",
            sign,
            self.rupees().abs(),
            self.paisa_part()
        )
    }
}

/// Groups the integer part in thousands: 1234567 -> "1,234,567".
fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Trait Implementations
// =============================================================================

// Operators saturate at the i64 range rather than wrapping.

/// Displays as `Rs 12,500.00` (the symbol the PDF exports settled on).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}Rs {}.{:02}",
            sign,
            group_thousands(self.rupees().abs()),
            self.paisa_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

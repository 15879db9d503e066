//! # Domain Types
//!
//! Core domain types used throughout the Murick battery shop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │   BatterySku    │   │   SaleRecord    │   │   ShopConfig    │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │◄──│  battery_id     │   │  shop_name      │        │
//! │  │  brand          │   │  (weak ref)     │   │  proprietor     │        │
//! │  │  capacity       │   │  brand snapshot │   │  contact        │        │
//! │  │  model          │   │  unit_price     │   │  address        │        │
//! │  │  prices, stock  │   │  totals, profit │   │  email          │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  Inputs:  NewBatterySku, SkuPatch, SaleRequest                          │
//! │  Derived: Margin                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records serialize as flat snake_case JSON objects: money as a number of
//! paisa, timestamps as RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

/// Customer name stored when the operator leaves it blank.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// Label used wherever a sale references a SKU that no longer exists.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Default low-stock threshold for new SKUs.
pub const DEFAULT_LOW_STOCK_ALERT: i64 = 5;

/// Default warranty for new SKUs.
pub const DEFAULT_WARRANTY_MONTHS: u32 = 12;

fn default_low_stock_alert() -> i64 {
    DEFAULT_LOW_STOCK_ALERT
}

fn default_warranty_months() -> u32 {
    DEFAULT_WARRANTY_MONTHS
}

fn walk_in_customer() -> String {
    WALK_IN_CUSTOMER.to_string()
}

/// Stored sales may carry `null` or `""` for the customer name.
fn customer_or_walk_in<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(walk_in_customer))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Battery SKU
// =============================================================================

/// A stockable battery product.
///
/// The `(brand, capacity, model)` triple is descriptive, not a key: two SKUs
/// with the same triple are distinct items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatterySku {
    /// Unique identifier (UUID v4), assigned on creation.
    pub id: String,

    pub brand: String,
    pub capacity: String,
    pub model: String,

    /// Cost of one unit to the shop.
    pub purchase_price: Money,

    /// Default price offered to customers.
    pub selling_price: Money,

    /// Units on hand. Never negative.
    pub stock_quantity: i64,

    /// Stock at or below this level is reported as low.
    #[serde(default = "default_low_stock_alert")]
    pub low_stock_alert: i64,

    #[serde(default = "default_warranty_months")]
    pub warranty_months: u32,

    #[serde(default)]
    pub supplier: Option<String>,

    /// When the SKU was first added. Never changes.
    #[ts(as = "String")]
    pub date_added: DateTime<Utc>,
}

impl BatterySku {
    /// Human description, e.g. `AGS 55Ah N50`.
    pub fn label(&self) -> String {
        format!("{} {} {}", self.brand, self.capacity, self.model)
    }

    /// Profit on one unit at the list price. May be negative.
    #[inline]
    pub fn profit_per_unit(&self) -> Money {
        self.selling_price - self.purchase_price
    }

    /// Value of stock on hand at cost.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.purchase_price.multiply_quantity(self.stock_quantity)
    }

    /// Revenue if all stock sells at the list price.
    #[inline]
    pub fn potential_revenue(&self) -> Money {
        self.selling_price.multiply_quantity(self.stock_quantity)
    }

    /// Inclusive threshold: stock equal to the alert level counts as low.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.low_stock_alert
    }
}

/// Input for adding a SKU to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBatterySku {
    pub brand: String,
    pub capacity: String,
    pub model: String,
    pub purchase_price: Money,
    pub selling_price: Money,
    pub stock_quantity: i64,
    #[serde(default = "default_low_stock_alert")]
    pub low_stock_alert: i64,
    #[serde(default = "default_warranty_months")]
    pub warranty_months: u32,
    #[serde(default)]
    pub supplier: Option<String>,
}

impl NewBatterySku {
    /// Creates an input with the default alert level and warranty.
    pub fn new(
        brand: impl Into<String>,
        capacity: impl Into<String>,
        model: impl Into<String>,
        purchase_price: Money,
        selling_price: Money,
        stock_quantity: i64,
    ) -> Self {
        Self {
            brand: brand.into(),
            capacity: capacity.into(),
            model: model.into(),
            purchase_price,
            selling_price,
            stock_quantity,
            low_stock_alert: DEFAULT_LOW_STOCK_ALERT,
            warranty_months: DEFAULT_WARRANTY_MONTHS,
            supplier: None,
        }
    }

    pub fn with_low_stock_alert(mut self, alert: i64) -> Self {
        self.low_stock_alert = alert;
        self
    }

    pub fn with_warranty_months(mut self, months: u32) -> Self {
        self.warranty_months = months;
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }
}

/// Partial update for an existing SKU. `None` leaves a field unchanged.
///
/// `supplier` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkuPatch {
    pub brand: Option<String>,
    pub capacity: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Money>,
    pub selling_price: Option<Money>,
    pub stock_quantity: Option<i64>,
    pub low_stock_alert: Option<i64>,
    pub warranty_months: Option<u32>,
    #[ts(as = "Option<String>")]
    pub supplier: Option<Option<String>>,
}

impl SkuPatch {
    pub fn is_empty(&self) -> bool {
        *self == SkuPatch::default()
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// One completed sale of a single SKU. Immutable once appended.
///
/// `brand`, `capacity` and `model` are frozen at sale time so the record stays
/// describable after the SKU is edited or removed. Records written before the
/// snapshot existed deserialize with empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRecord {
    pub id: String,

    /// Weak reference to [`BatterySku::id`]; may dangle after removal.
    pub battery_id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub capacity: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub model: String,

    pub quantity_sold: i64,
    pub unit_price: Money,
    pub total_amount: Money,
    pub profit_per_unit: Money,
    pub total_profit: Money,

    #[serde(default = "walk_in_customer", deserialize_with = "customer_or_walk_in")]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub warranty_end_date: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,

    /// Operator id. Empty on records that predate operator tracking.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sold_by: String,
}

impl SaleRecord {
    /// Short invoice number: `#` plus the last 8 characters of the id, uppercased.
    pub fn invoice_number(&self) -> String {
        let chars: Vec<char> = self.id.chars().collect();
        let start = chars.len().saturating_sub(8);
        let tail: String = chars[start..].iter().collect();
        format!("#{}", tail.to_uppercase())
    }

    pub fn is_walk_in(&self) -> bool {
        self.customer_name.trim().is_empty() || self.customer_name == WALK_IN_CUSTOMER
    }

    /// The frozen description, or `None` for legacy records without one.
    pub fn snapshot_label(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.brand, &self.capacity, &self.model]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Input for recording a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    pub battery_id: String,
    pub quantity_sold: i64,
    pub unit_price: Money,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Operator id of whoever made the sale.
    pub sold_by: String,
}

impl SaleRequest {
    pub fn new(
        battery_id: impl Into<String>,
        quantity_sold: i64,
        unit_price: Money,
        sold_by: impl Into<String>,
    ) -> Self {
        Self {
            battery_id: battery_id.into(),
            quantity_sold,
            unit_price,
            customer_name: None,
            customer_phone: None,
            sold_by: sold_by.into(),
        }
    }

    pub fn with_customer(mut self, name: impl Into<String>, phone: Option<String>) -> Self {
        self.customer_name = Some(name.into());
        self.customer_phone = phone;
        self
    }
}

// =============================================================================
// Shop Configuration
// =============================================================================

/// Header details printed on receipts and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShopConfig {
    pub shop_name: String,
    #[serde(default)]
    pub proprietor_name: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            shop_name: "Murick Battery Shop".to_string(),
            proprietor_name: String::new(),
            contact_number: String::new(),
            address: String::new(),
            email: None,
        }
    }
}

// =============================================================================
// Margin
// =============================================================================

/// Profit margin over purchase price, in basis points (1250 = 12.50%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind", content = "bps")]
pub enum Margin {
    Percent(i64),
    /// Purchase price is zero, so a percentage is undefined.
    NotApplicable,
}

impl Margin {
    pub fn bps(&self) -> Option<i64> {
        match self {
            Margin::Percent(bps) => Some(*bps),
            Margin::NotApplicable => None,
        }
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Margin::Percent(bps) => {
                let sign = if *bps < 0 { "-" } else { "" };
                let abs = bps.abs();
                write!(f, "{}{}.{:02}%", sign, abs / 100, abs % 100)
            }
            Margin::NotApplicable => write!(f, "N/A"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

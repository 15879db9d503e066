//! # murick-core: Pure Business Logic for the Murick Battery Shop
//!
//! This crate is the **heart** of Murick. It holds the inventory ledger, the
//! sales recorder and the analytics engine as plain data plus functions, with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Murick Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    murick CLI (apps/shop-cli)                   │    │
//! │  │   inventory ──► sale ──► report ──► export ──► receipt          │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │          murick-db: ShopService (per-shop lock + txn)           │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ ShopContext                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ murick-core (THIS CRATE) ★                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐    │    │
//! │  │   │  ledger   │  │   sales   │  │ analytics │  │  receipt  │    │    │
//! │  │   │ SKUs and  │  │ SalesLog  │  │ valuation │  │  report   │    │    │
//! │  │   │  stock    │  │  records  │  │ rankings  │  │  catalog  │    │    │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘    │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (BatterySku, SaleRecord, ShopConfig)
//! - [`money`] - Money type with integer paisa arithmetic
//! - [`ledger`] - Inventory ledger
//! - [`sales`] - Sales recorder
//! - [`analytics`] - Aggregates and the dashboard
//! - [`filter`] - Date and customer filters for sales
//! - [`shop`] - Per-shop context and the storage boundary
//! - [`receipt`], [`report`], [`catalog`] - Printouts, exports, brand lists
//! - [`error`], [`validation`] - Errors and input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use murick_core::{Money, NewBatterySku, SaleFilter, SaleRequest, ShopContext};
//!
//! let mut shop = ShopContext::new("main").unwrap();
//! let sku = shop
//!     .add_sku(NewBatterySku::new(
//!         "AGS", "55Ah", "N50",
//!         Money::from_rupees(8_000),
//!         Money::from_rupees(10_000),
//!         10,
//!     ))
//!     .unwrap();
//!
//! let sale = shop
//!     .record_sale(SaleRequest::new(&sku.id, 3, Money::from_rupees(10_000), "owner"))
//!     .unwrap();
//!
//! assert_eq!(shop.ledger.get(&sku.id).unwrap().stock_quantity, 7);
//! assert_eq!(sale.total_profit, Money::from_rupees(6_000));
//! assert_eq!(
//!     shop.analytics().sales_summary(&SaleFilter::all()).total_amount,
//!     Money::from_rupees(30_000)
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod money;
pub mod receipt;
pub mod report;
pub mod sales;
pub mod shop;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use analytics::{
    margin_percent, Analytics, BrandPerformance, Dashboard, InventoryValuation, SalesSummary,
    TopSeller,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::SaleFilter;
pub use ledger::InventoryLedger;
pub use money::Money;
pub use receipt::Receipt;
pub use report::{InventoryReport, ReportError, SalesReport};
pub use sales::SalesLog;
pub use shop::ShopContext;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shop id used when none is configured (single-shop installs).
pub const DEFAULT_SHOP_ID: &str = "main";

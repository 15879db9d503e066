//! # Analytics Engine
//!
//! Read-only aggregates over one shop's ledger and sales log.
//!
//! Nothing here is cached: every call walks the current collections, so the
//! numbers can never drift from the data they summarize.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │ InventoryLedger  │     │    SalesLog      │
//! └────────┬─────────┘     └────────┬─────────┘
//!          │   &                    │   &
//!          └──────────┬─────────────┘
//!                     ▼
//!              Analytics<'a>
//!     valuation · low stock · summary
//!     top sellers · brands · dashboard
//! ```

use serde::Serialize;
use std::collections::HashMap;
use ts_rs::TS;

use crate::filter::SaleFilter;
use crate::ledger::InventoryLedger;
use crate::money::Money;
use crate::sales::SalesLog;
use crate::types::{BatterySku, Margin, UNKNOWN_LABEL};

/// How many entries the dashboard shows in each list.
pub const DASHBOARD_LIST_LIMIT: usize = 5;

// =============================================================================
// Result Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct InventoryValuation {
    /// Σ stock × purchase price.
    pub total_value: Money,
    pub total_units: i64,
    /// Number of distinct SKUs.
    pub item_count: usize,
    /// Σ stock × selling price.
    pub potential_revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub total_amount: Money,
    pub total_profit: Money,
    pub total_transactions: usize,
    pub total_items_sold: i64,
    /// Zero when there are no transactions.
    pub average_sale: Money,
}

/// One row of the top-seller ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct TopSeller {
    pub battery_id: String,
    /// Current SKU description, or `Unknown` if the SKU was removed.
    pub label: String,
    /// Whether `battery_id` still exists in the ledger.
    pub resolved: bool,
    pub quantity_sold: i64,
    pub total_amount: Money,
    /// Description frozen on the first sale of the group, if recorded.
    pub sold_as: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct BrandPerformance {
    pub brand: String,
    pub total_amount: Money,
    pub total_profit: Money,
    pub quantity_sold: i64,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Dashboard {
    pub valuation: InventoryValuation,
    pub low_stock_count: usize,
    pub sales: SalesSummary,
    pub top_sellers: Vec<TopSeller>,
    pub low_stock_items: Vec<BatterySku>,
}

// =============================================================================
// Analytics
// =============================================================================

/// Borrowing view used to compute aggregates.
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    ledger: &'a InventoryLedger,
    sales: &'a SalesLog,
}

impl<'a> Analytics<'a> {
    pub fn new(ledger: &'a InventoryLedger, sales: &'a SalesLog) -> Self {
        Self { ledger, sales }
    }

    pub fn inventory_valuation(&self) -> InventoryValuation {
        let skus = self.ledger.list_skus();
        InventoryValuation {
            total_value: skus.iter().map(BatterySku::stock_value).sum(),
            total_units: skus
                .iter()
                .fold(0i64, |units, sku| units.saturating_add(sku.stock_quantity)),
            item_count: skus.len(),
            potential_revenue: skus.iter().map(BatterySku::potential_revenue).sum(),
        }
    }

    /// SKUs at or below their alert level, in ledger order.
    pub fn low_stock_items(&self) -> Vec<&'a BatterySku> {
        self.ledger
            .list_skus()
            .iter()
            .filter(|sku| sku.is_low_stock())
            .collect()
    }

    pub fn sales_summary(&self, filter: &SaleFilter) -> SalesSummary {
        let mut total_amount = Money::zero();
        let mut total_profit = Money::zero();
        let mut total_transactions = 0usize;
        let mut total_items_sold = 0i64;

        for record in self.sales.filtered(filter) {
            total_amount += record.total_amount;
            total_profit += record.total_profit;
            total_transactions += 1;
            total_items_sold = total_items_sold.saturating_add(record.quantity_sold);
        }

        SalesSummary {
            total_amount,
            total_profit,
            total_transactions,
            total_items_sold,
            average_sale: total_amount.divide_rounded(total_transactions as i64),
        }
    }

    /// Ranks SKUs by units sold, highest first.
    ///
    /// Ties keep the order in which each SKU first appears in the sales log.
    /// Sales of removed SKUs stay in the ranking under the `Unknown` label.
    pub fn top_selling_skus(&self, limit: usize, filter: &SaleFilter) -> Vec<TopSeller> {
        let mut groups: Vec<TopSeller> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for record in self.sales.filtered(filter) {
            match index.get(record.battery_id.as_str()) {
                Some(&i) => {
                    groups[i].quantity_sold = groups[i].quantity_sold.saturating_add(record.quantity_sold);
                    groups[i].total_amount += record.total_amount;
                }
                None => {
                    let sku = self.ledger.get(&record.battery_id);
                    index.insert(record.battery_id.as_str(), groups.len());
                    groups.push(TopSeller {
                        battery_id: record.battery_id.clone(),
                        label: sku
                            .map(BatterySku::label)
                            .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                        resolved: sku.is_some(),
                        quantity_sold: record.quantity_sold,
                        total_amount: record.total_amount,
                        sold_as: record.snapshot_label(),
                    });
                }
            }
        }

        groups.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
        groups.truncate(limit);
        groups
    }

    /// Sales grouped by brand, highest revenue first.
    ///
    /// Uses the SKU's current brand, then the brand frozen on the sale, then
    /// `Unknown`.
    pub fn brand_performance(&self, filter: &SaleFilter) -> Vec<BrandPerformance> {
        let mut groups: Vec<BrandPerformance> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in self.sales.filtered(filter) {
            let brand = match self.ledger.get(&record.battery_id) {
                Some(sku) => sku.brand.clone(),
                None if !record.brand.trim().is_empty() => record.brand.clone(),
                None => UNKNOWN_LABEL.to_string(),
            };

            let i = match index.get(&brand) {
                Some(&i) => i,
                None => {
                    index.insert(brand.clone(), groups.len());
                    groups.push(BrandPerformance {
                        brand,
                        total_amount: Money::zero(),
                        total_profit: Money::zero(),
                        quantity_sold: 0,
                        transactions: 0,
                    });
                    groups.len() - 1
                }
            };

            let group = &mut groups[i];
            group.total_amount += record.total_amount;
            group.total_profit += record.total_profit;
            group.quantity_sold = group.quantity_sold.saturating_add(record.quantity_sold);
            group.transactions += 1;
        }

        groups.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        groups
    }

    pub fn dashboard(&self, filter: &SaleFilter) -> Dashboard {
        let low_stock = self.low_stock_items();
        Dashboard {
            valuation: self.inventory_valuation(),
            low_stock_count: low_stock.len(),
            sales: self.sales_summary(filter),
            top_sellers: self.top_selling_skus(DASHBOARD_LIST_LIMIT, filter),
            low_stock_items: low_stock
                .into_iter()
                .take(DASHBOARD_LIST_LIMIT)
                .cloned()
                .collect(),
        }
    }
}

/// Margin of `selling` over `purchase`, rounded half away from zero to a
/// basis point. Undefined when the purchase price is zero.
///
/// Computed in `i128` so any pair of paisa amounts is exact. A margin beyond
/// the `i64` range clamps.
pub fn margin_percent(purchase: Money, selling: Money) -> Margin {
    if purchase.is_zero() {
        return Margin::NotApplicable;
    }
    let numerator = (selling.paisa() as i128 - purchase.paisa() as i128) * 10_000;
    let divisor = purchase.paisa() as i128;
    let quotient = numerator / divisor;
    let remainder = numerator % divisor;

    let bps = if 2 * remainder.abs() >= divisor.abs() {
        quotient + numerator.signum() * divisor.signum()
    } else {
        quotient
    };
    Margin::Percent(bps.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
}

// =============================================================================
// Unit Tests
// =============================================================================

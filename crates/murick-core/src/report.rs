//! # Reports
//!
//! Tabular inventory and sales reports, ready to be written out as
//! spreadsheets. Rows are plain structs whose serde names are the column
//! headers, so any serde-based writer (CSV in the CLI) produces the same
//! sheet.
//!
//! Money columns hold plain decimal strings (`10000.50`) so spreadsheet tools
//! parse them as numbers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::analytics::{Analytics, SalesSummary};
use crate::filter::SaleFilter;
use crate::ledger::InventoryLedger;
use crate::sales::SalesLog;
use crate::types::{ShopConfig, UNKNOWN_LABEL, WALK_IN_CUSTOMER};

const NOT_AVAILABLE: &str = "N/A";
const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%I:%M:%S %p";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The selection is empty; no file should be produced.
    #[error("No {0} data to export")]
    NothingToExport(&'static str),
}

// =============================================================================
// Inventory Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryReportRow {
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Capacity")]
    pub capacity: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Stock Quantity")]
    pub stock_quantity: i64,
    #[serde(rename = "Purchase Price (Rs)")]
    pub purchase_price: String,
    #[serde(rename = "Selling Price (Rs)")]
    pub selling_price: String,
    #[serde(rename = "Stock Value (Rs)")]
    pub stock_value: String,
    #[serde(rename = "Potential Revenue (Rs)")]
    pub potential_revenue: String,
    #[serde(rename = "Profit per Unit (Rs)")]
    pub profit_per_unit: String,
    #[serde(rename = "Low Stock Alert")]
    pub low_stock_alert: i64,
    #[serde(rename = "Warranty (Months)")]
    pub warranty_months: u32,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Date Added")]
    pub date_added: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryReportSummary {
    #[serde(rename = "Shop Name")]
    pub shop_name: String,
    #[serde(rename = "Proprietor")]
    pub proprietor: String,
    #[serde(rename = "Contact")]
    pub contact: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Export Date")]
    pub export_date: String,
    #[serde(rename = "Total Unique Items")]
    pub total_unique_items: usize,
    #[serde(rename = "Total Stock Value")]
    pub total_stock_value: String,
    #[serde(rename = "Total Potential Revenue")]
    pub total_potential_revenue: String,
    #[serde(rename = "Low Stock Items")]
    pub low_stock_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryReport {
    pub rows: Vec<InventoryReportRow>,
    pub summary: InventoryReportSummary,
}

impl InventoryReport {
    pub fn build(
        ledger: &InventoryLedger,
        shop: &ShopConfig,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, ReportError> {
        if ledger.is_empty() {
            return Err(ReportError::NothingToExport("inventory"));
        }

        let rows = ledger
            .list_skus()
            .iter()
            .map(|sku| InventoryReportRow {
                brand: sku.brand.clone(),
                capacity: sku.capacity.clone(),
                model: sku.model.clone(),
                stock_quantity: sku.stock_quantity,
                purchase_price: sku.purchase_price.to_plain_string(),
                selling_price: sku.selling_price.to_plain_string(),
                stock_value: sku.stock_value().to_plain_string(),
                potential_revenue: sku.potential_revenue().to_plain_string(),
                profit_per_unit: sku.profit_per_unit().to_plain_string(),
                low_stock_alert: sku.low_stock_alert,
                warranty_months: sku.warranty_months,
                supplier: sku
                    .supplier
                    .clone()
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                date_added: sku.date_added.format(DATE_FORMAT).to_string(),
            })
            .collect();

        let empty_sales = SalesLog::new();
        let analytics = Analytics::new(ledger, &empty_sales);
        let valuation = analytics.inventory_valuation();

        let summary = InventoryReportSummary {
            shop_name: shop.shop_name.clone(),
            proprietor: shop.proprietor_name.clone(),
            contact: shop.contact_number.clone(),
            address: shop.address.clone(),
            export_date: generated_at.format(DATE_FORMAT).to_string(),
            total_unique_items: valuation.item_count,
            total_stock_value: valuation.total_value.to_plain_string(),
            total_potential_revenue: valuation.potential_revenue.to_plain_string(),
            low_stock_items: analytics.low_stock_items().len(),
        };

        Ok(Self { rows, summary })
    }
}

// =============================================================================
// Sales Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Invoice #")]
    pub invoice: String,
    #[serde(rename = "Battery")]
    pub battery: String,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "Unit Price (Rs)")]
    pub unit_price: String,
    #[serde(rename = "Total Amount (Rs)")]
    pub total_amount: String,
    #[serde(rename = "Profit per Unit (Rs)")]
    pub profit_per_unit: String,
    #[serde(rename = "Total Profit (Rs)")]
    pub total_profit: String,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Customer Phone")]
    pub customer_phone: String,
    #[serde(rename = "Sold By")]
    pub sold_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReportSummary {
    #[serde(rename = "Shop Name")]
    pub shop_name: String,
    #[serde(rename = "Proprietor")]
    pub proprietor: String,
    #[serde(rename = "Export Date")]
    pub export_date: String,
    #[serde(rename = "Report Period")]
    pub report_period: String,
    #[serde(rename = "Total Transactions")]
    pub total_transactions: usize,
    #[serde(rename = "Total Items Sold")]
    pub total_items_sold: i64,
    #[serde(rename = "Total Sales Amount (Rs)")]
    pub total_sales_amount: String,
    #[serde(rename = "Total Profit (Rs)")]
    pub total_profit: String,
    #[serde(rename = "Average Sale Amount (Rs)")]
    pub average_sale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    pub rows: Vec<SalesReportRow>,
    pub summary: SalesReportSummary,
}

impl SalesReport {
    /// Builds the report for the sales selected by `filter`.
    ///
    /// Sales of removed SKUs are listed under `Unknown`.
    pub fn build(
        ledger: &InventoryLedger,
        sales: &SalesLog,
        shop: &ShopConfig,
        filter: &SaleFilter,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, ReportError> {
        if sales.is_empty() {
            return Err(ReportError::NothingToExport("sales"));
        }

        let rows: Vec<SalesReportRow> = sales
            .filtered(filter)
            .map(|sale| SalesReportRow {
                date: sale.sale_date.format(DATE_FORMAT).to_string(),
                time: sale.sale_date.format(TIME_FORMAT).to_string(),
                invoice: sale.invoice_number(),
                battery: ledger
                    .get(&sale.battery_id)
                    .map(|sku| sku.label())
                    .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                quantity: sale.quantity_sold,
                unit_price: sale.unit_price.to_plain_string(),
                total_amount: sale.total_amount.to_plain_string(),
                profit_per_unit: sale.profit_per_unit.to_plain_string(),
                total_profit: sale.total_profit.to_plain_string(),
                customer_name: if sale.customer_name.trim().is_empty() {
                    WALK_IN_CUSTOMER.to_string()
                } else {
                    sale.customer_name.clone()
                },
                customer_phone: sale
                    .customer_phone
                    .clone()
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                sold_by: if sale.sold_by.is_empty() {
                    NOT_AVAILABLE.to_string()
                } else {
                    sale.sold_by.clone()
                },
            })
            .collect();

        if rows.is_empty() {
            return Err(ReportError::NothingToExport("sales for the selected period"));
        }

        let totals: SalesSummary = Analytics::new(ledger, sales).sales_summary(filter);
        let summary = SalesReportSummary {
            shop_name: shop.shop_name.clone(),
            proprietor: shop.proprietor_name.clone(),
            export_date: generated_at.format(DATE_FORMAT).to_string(),
            report_period: filter.period_label(),
            total_transactions: totals.total_transactions,
            total_items_sold: totals.total_items_sold,
            total_sales_amount: totals.total_amount.to_plain_string(),
            total_profit: totals.total_profit.to_plain_string(),
            average_sale: totals.average_sale.to_plain_string(),
        };

        Ok(Self { rows, summary })
    }
}

/// File name for an export, e.g. `Murick_Batteries_Sales_2024-01-15.csv`.
pub fn export_file_name(shop: &ShopConfig, kind: &str, generated_at: DateTime<Utc>, ext: &str) -> String {
    let shop_part: String = shop.shop_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!(
        "{}_{}_{}.{}",
        shop_part,
        kind,
        generated_at.format("%Y-%m-%d"),
        ext
    )
}

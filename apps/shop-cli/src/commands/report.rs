//! # Report Commands
//!
//! Read-only views over one committed snapshot of the shop.

use chrono::Utc;
use murick_core::{BrandPerformance, Dashboard, InventoryValuation, SalesSummary, TopSeller};

use super::sale_filter;
use crate::cli::ReportCommand;
use crate::error::CliResult;
use crate::output::{key_values, Align, CommandOutput, Table};
use crate::state::AppState;

pub async fn run(state: &AppState, command: ReportCommand) -> CliResult<CommandOutput> {
    let now = Utc::now();
    let shop = state.shops().snapshot(&state.shop_id).await?;
    let analytics = shop.analytics();

    match command {
        ReportCommand::Dashboard(args) => {
            let filter = sale_filter(&args, now)?;
            let dashboard = analytics.dashboard(&filter);
            let text = dashboard_text(&dashboard, &filter.period_label());
            CommandOutput::new(&dashboard, text)
        }

        ReportCommand::TopSellers { limit, filter } => {
            let filter = sale_filter(&filter, now)?;
            let top = analytics.top_selling_skus(limit, &filter);
            let text = if top.is_empty() {
                format!("No sales for {}\n", filter.period_label())
            } else {
                top_sellers_table(&top)
            };
            CommandOutput::new(&top, text)
        }

        ReportCommand::Brands(args) => {
            let filter = sale_filter(&args, now)?;
            let brands = analytics.brand_performance(&filter);
            let text = if brands.is_empty() {
                format!("No sales for {}\n", filter.period_label())
            } else {
                brands_table(&brands)
            };
            CommandOutput::new(&brands, text)
        }

        ReportCommand::Summary(args) => {
            let filter = sale_filter(&args, now)?;
            let summary = analytics.sales_summary(&filter);
            let mut text = format!("Sales summary ({})\n", filter.period_label());
            text.push_str(&summary_text(&summary));
            CommandOutput::new(&summary, text)
        }
    }
}

fn summary_text(summary: &SalesSummary) -> String {
    key_values(&[
        ("Transactions", summary.total_transactions.to_string()),
        ("Items sold", summary.total_items_sold.to_string()),
        ("Total sales", summary.total_amount.to_string()),
        ("Total profit", summary.total_profit.to_string()),
        ("Average sale", summary.average_sale.to_string()),
    ])
}

fn valuation_text(valuation: &InventoryValuation) -> String {
    key_values(&[
        ("SKUs", valuation.item_count.to_string()),
        ("Units in stock", valuation.total_units.to_string()),
        ("Stock value", valuation.total_value.to_string()),
        ("Potential revenue", valuation.potential_revenue.to_string()),
    ])
}

fn dashboard_text(dashboard: &Dashboard, period: &str) -> String {
    let mut text = String::from("== Inventory ==\n");
    text.push_str(&valuation_text(&dashboard.valuation));
    text.push_str(&format!("\n== Sales ({}) ==\n", period));
    text.push_str(&summary_text(&dashboard.sales));

    if !dashboard.top_sellers.is_empty() {
        text.push_str("\n== Top sellers ==\n");
        text.push_str(&top_sellers_table(&dashboard.top_sellers));
    }

    text.push_str(&format!("\n== Low stock ({}) ==\n", dashboard.low_stock_count));
    if dashboard.low_stock_items.is_empty() {
        text.push_str("None\n");
    }
    for sku in &dashboard.low_stock_items {
        text.push_str(&format!(
            "{}  {} left (alert at {})\n",
            sku.label(),
            sku.stock_quantity,
            sku.low_stock_alert
        ));
    }
    text
}

fn top_sellers_table(top: &[TopSeller]) -> String {
    let mut table = Table::new(&[
        ("#", Align::Right),
        ("Battery", Align::Left),
        ("Sold", Align::Right),
        ("Revenue", Align::Right),
    ]);
    for (rank, seller) in top.iter().enumerate() {
        let label = match (&seller.sold_as, seller.resolved) {
            (Some(sold_as), false) => format!("{} (sold as {})", seller.label, sold_as),
            _ => seller.label.clone(),
        };
        table.row(vec![
            (rank + 1).to_string(),
            label,
            seller.quantity_sold.to_string(),
            seller.total_amount.to_string(),
        ]);
    }
    table.render()
}

fn brands_table(brands: &[BrandPerformance]) -> String {
    let mut table = Table::new(&[
        ("Brand", Align::Left),
        ("Sales", Align::Right),
        ("Units", Align::Right),
        ("Revenue", Align::Right),
        ("Profit", Align::Right),
    ]);
    for brand in brands {
        table.row(vec![
            brand.brand.clone(),
            brand.transactions.to_string(),
            brand.quantity_sold.to_string(),
            brand.total_amount.to_string(),
            brand.total_profit.to_string(),
        ]);
    }
    table.render()
}

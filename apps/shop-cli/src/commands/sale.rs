//! # Sale Commands

use chrono::Utc;
use murick_core::validation::{parse_money, parse_quantity};
use murick_core::{CoreError, Receipt, SaleRecord, SaleRequest, ShopContext};
use serde::Serialize;

use super::{sale_filter, sale_item_label};
use crate::cli::{RecordSaleArgs, SaleCommand};
use crate::error::{ApiError, CliResult};
use crate::output::{Align, CommandOutput, Table};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct RecordedSale<'a> {
    sale: &'a SaleRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<Receipt>,
}

pub async fn run(state: &AppState, command: SaleCommand) -> CliResult<CommandOutput> {
    match command {
        SaleCommand::Record(args) => record(state, args).await,

        SaleCommand::List(filter_args) => {
            let filter = sale_filter(&filter_args, Utc::now())?;
            let shop = state.shops().snapshot(&state.shop_id).await?;
            let mut sales: Vec<&SaleRecord> = shop.sales.filtered(&filter).collect();
            sales.reverse();

            let text = if sales.is_empty() {
                format!("No sales for {}\n", filter.period_label())
            } else {
                sales_table(&shop, &sales)
            };
            CommandOutput::new(&sales, text)
        }

        SaleCommand::Receipt { sale_id, width } => {
            let shop = state.shops().snapshot(&state.shop_id).await?;
            let sale = find_sale(&shop, &sale_id)
                .ok_or_else(|| ApiError::not_found("Sale", &sale_id))?;
            let receipt = Receipt::build(sale, shop.ledger.get(&sale.battery_id), &shop.config);
            let text = receipt.render(width.unwrap_or(state.config.receipt.paper_width));
            CommandOutput::new(&receipt, text)
        }
    }
}

async fn record(state: &AppState, args: RecordSaleArgs) -> CliResult<CommandOutput> {
    let quantity = parse_quantity("quantity_sold", &args.qty)?;
    let price = args
        .price
        .as_deref()
        .map(|price| parse_money("unit_price", price))
        .transpose()?;

    let sold_by = args.sold_by.unwrap_or_else(|| state.operator().to_string());
    let sku_id = args.sku;
    let (customer, phone) = (args.customer, args.phone);

    // Without --price the sale goes through at the list price as stored when
    // the shop lock is taken.
    let sale = state
        .shops()
        .record_sale_with(&state.shop_id, move |shop| {
            let unit_price = match price {
                Some(price) => price,
                None => shop
                    .ledger
                    .get(&sku_id)
                    .map(|sku| sku.selling_price)
                    .ok_or_else(|| CoreError::SkuNotFound(sku_id.clone()))?,
            };
            let mut request = SaleRequest::new(sku_id, quantity, unit_price, sold_by);
            match customer {
                Some(name) => request = request.with_customer(name, phone),
                None => request.customer_phone = phone,
            }
            Ok(request)
        })
        .await?;

    let mut text = format!(
        "Recorded sale {}: {} × {} = {} (profit {})\n",
        sale.invoice_number(),
        sale.quantity_sold,
        sale.snapshot_label().unwrap_or_else(|| sale.battery_id.clone()),
        sale.total_amount,
        sale.total_profit,
    );

    let receipt = if args.receipt {
        let shop = state.shops().snapshot(&state.shop_id).await?;
        let receipt = Receipt::build(&sale, shop.ledger.get(&sale.battery_id), &shop.config);
        text.push('\n');
        text.push_str(&receipt.render(state.config.receipt.paper_width));
        Some(receipt)
    } else {
        None
    };

    CommandOutput::new(&RecordedSale { sale: &sale, receipt }, text)
}

/// Looks a sale up by id or by invoice number (`#55440ABC` or `55440abc`).
pub fn find_sale<'a>(shop: &'a ShopContext, key: &str) -> Option<&'a SaleRecord> {
    let key = key.trim();
    if let Some(sale) = shop.sales.get(key) {
        return Some(sale);
    }
    let invoice = format!("#{}", key.trim_start_matches('#').to_uppercase());
    shop.sales
        .records()
        .iter()
        .rev()
        .find(|sale| sale.invoice_number() == invoice)
}

fn sales_table(shop: &ShopContext, sales: &[&SaleRecord]) -> String {
    let mut table = Table::new(&[
        ("Invoice", Align::Left),
        ("Date", Align::Left),
        ("Battery", Align::Left),
        ("Qty", Align::Right),
        ("Total", Align::Right),
        ("Profit", Align::Right),
        ("Customer", Align::Left),
        ("Sold by", Align::Left),
    ]);
    for sale in sales {
        table.row(vec![
            sale.invoice_number(),
            sale.sale_date.format("%d/%m/%Y %H:%M").to_string(),
            sale_item_label(shop, sale),
            sale.quantity_sold.to_string(),
            sale.total_amount.to_string(),
            sale.total_profit.to_string(),
            sale.customer_name.clone(),
            sale.sold_by.clone(),
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use murick_core::{Money, NewBatterySku};

    #[test]
    fn test_find_sale_by_invoice() {
        let mut shop = ShopContext::new("main").unwrap();
        let sku = shop
            .add_sku(NewBatterySku::new(
                "Volta",
                "100Ah",
                "V100",
                Money::from_rupees(20_000),
                Money::from_rupees(24_000),
                3,
            ))
            .unwrap();
        let sale = shop
            .record_sale(SaleRequest::new(&sku.id, 1, Money::from_rupees(24_000), "owner"))
            .unwrap();

        assert_eq!(find_sale(&shop, &sale.id).map(|s| &s.id), Some(&sale.id));

        let invoice = sale.invoice_number();
        assert_eq!(find_sale(&shop, &invoice).map(|s| &s.id), Some(&sale.id));
        let bare = invoice.trim_start_matches('#').to_lowercase();
        assert_eq!(find_sale(&shop, &bare).map(|s| &s.id), Some(&sale.id));

        assert!(find_sale(&shop, "#00000000").is_none());
    }
}

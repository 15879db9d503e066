//! # Inventory Commands

use murick_core::catalog::{canonical_brand, is_known_capacity};
use murick_core::validation::{parse_money, parse_quantity};
use murick_core::{margin_percent, BatterySku, NewBatterySku, SkuPatch, DEFAULT_WARRANTY_MONTHS};
use tracing::debug;

use crate::cli::{AddSkuArgs, InventoryCommand, UpdateSkuArgs};
use crate::error::{ApiError, CliResult};
use crate::output::{Align, CommandOutput, Table};
use crate::state::AppState;

pub async fn run(state: &AppState, command: InventoryCommand) -> CliResult<CommandOutput> {
    match command {
        InventoryCommand::Add(args) => {
            let input = new_sku(args)?;
            let sku = state.shops().add_sku(&state.shop_id, input).await?;
            let mut text = format!("Added {} ({})\n", sku.label(), sku.id);
            if !is_known_capacity(&sku.capacity) {
                text.push_str(&format!(
                    "note: {} is not a catalog capacity (see `murick catalog`)\n",
                    sku.capacity
                ));
            }
            CommandOutput::new(&sku, text)
        }

        InventoryCommand::List { in_stock } => {
            debug!(shop_id = %state.shop_id, in_stock, "list inventory");
            let shop = state.shops().snapshot(&state.shop_id).await?;
            let skus: Vec<&BatterySku> = if in_stock {
                shop.ledger.in_stock_skus()
            } else {
                shop.ledger.list_skus().iter().collect()
            };
            let text = if skus.is_empty() {
                "No batteries in inventory\n".to_string()
            } else {
                sku_table(&skus)
            };
            CommandOutput::new(&skus, text)
        }

        InventoryCommand::Update(args) => {
            let id = args.id.clone();
            let patch = sku_patch(args)?;
            if patch.is_empty() {
                return Err(ApiError::validation("Nothing to update"));
            }
            let sku = state.shops().update_sku(&state.shop_id, &id, patch).await?;
            CommandOutput::new(&sku, format!("Updated {} (stock {})\n", sku.label(), sku.stock_quantity))
        }

        InventoryCommand::Remove { id } => {
            let sku = state.shops().remove_sku(&state.shop_id, &id).await?;
            CommandOutput::new(&sku, format!("Removed {}\n", sku.label()))
        }

        InventoryCommand::LowStock => {
            let shop = state.shops().snapshot(&state.shop_id).await?;
            let low = shop.analytics().low_stock_items();
            let text = if low.is_empty() {
                "All batteries are above their low-stock alert\n".to_string()
            } else {
                sku_table(&low)
            };
            CommandOutput::new(&low, text)
        }
    }
}

/// Parses the add form. Known brands are normalised to their catalog
/// spelling.
pub fn new_sku(args: AddSkuArgs) -> CliResult<NewBatterySku> {
    let mut input = NewBatterySku::new(
        canonical_brand(&args.brand),
        args.capacity,
        args.model,
        parse_money("purchase_price", &args.purchase_price)?,
        parse_money("selling_price", &args.selling_price)?,
        parse_quantity("stock_quantity", &args.stock)?,
    )
    .with_warranty_months(args.warranty_months.unwrap_or(DEFAULT_WARRANTY_MONTHS));

    if let Some(alert) = &args.low_stock_alert {
        input = input.with_low_stock_alert(parse_quantity("low_stock_alert", alert)?);
    }
    if let Some(supplier) = args.supplier {
        input = input.with_supplier(supplier);
    }
    Ok(input)
}

pub fn sku_patch(args: UpdateSkuArgs) -> CliResult<SkuPatch> {
    let parse_price = |field: &str, value: &Option<String>| -> CliResult<_> {
        Ok(value.as_deref().map(|v| parse_money(field, v)).transpose()?)
    };
    let parse_count = |field: &str, value: &Option<String>| -> CliResult<_> {
        Ok(value.as_deref().map(|v| parse_quantity(field, v)).transpose()?)
    };

    let supplier = if args.clear_supplier {
        Some(None)
    } else {
        args.supplier.clone().map(Some)
    };

    Ok(SkuPatch {
        brand: args.brand.as_deref().map(canonical_brand),
        capacity: args.capacity.clone(),
        model: args.model.clone(),
        purchase_price: parse_price("purchase_price", &args.purchase_price)?,
        selling_price: parse_price("selling_price", &args.selling_price)?,
        stock_quantity: parse_count("stock_quantity", &args.stock)?,
        low_stock_alert: parse_count("low_stock_alert", &args.low_stock_alert)?,
        warranty_months: args.warranty_months,
        supplier,
    })
}

fn sku_table(skus: &[&BatterySku]) -> String {
    let mut table = Table::new(&[
        ("ID", Align::Left),
        ("Battery", Align::Left),
        ("Stock", Align::Right),
        ("Purchase", Align::Right),
        ("Selling", Align::Right),
        ("Margin", Align::Right),
        ("Warranty", Align::Right),
        ("", Align::Left),
    ]);
    for sku in skus {
        table.row(vec![
            sku.id.clone(),
            sku.label(),
            sku.stock_quantity.to_string(),
            sku.purchase_price.to_string(),
            sku.selling_price.to_string(),
            margin_percent(sku.purchase_price, sku.selling_price).to_string(),
            format!("{}m", sku.warranty_months),
            if sku.is_low_stock() { "LOW".to_string() } else { String::new() },
        ]);
    }
    table.render()
}

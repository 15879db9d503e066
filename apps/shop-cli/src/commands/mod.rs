//! # Commands Module
//!
//! ```text
//! commands/
//! ├── mod.rs        ◄─── dispatch + shared helpers
//! ├── inventory.rs  ◄─── add, list, update, remove, low-stock
//! ├── sale.rs       ◄─── record, list, receipt
//! ├── report.rs     ◄─── dashboard, top-sellers, brands, summary
//! ├── export.rs     ◄─── CSV inventory and sales reports
//! ├── shop.rs       ◄─── shop header, shop list
//! └── catalog.rs    ◄─── known brands and capacities
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  murick sale record --sku <id> --qty 2                                  │
//! │         │                                                               │
//! │         ▼  clap                                                         │
//! │  Command::Sale(SaleCommand::Record(args))                               │
//! │         │                                                               │
//! │         ▼  parse operator input (murick_core::validation)               │
//! │  SaleRequest                                                            │
//! │         │                                                               │
//! │         ▼  state.shops().record_sale(shop_id, request)                  │
//! │  SaleRecord                                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CommandOutput { json, text } ──► Printer (table or --json)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod export;
pub mod inventory;
pub mod report;
pub mod sale;
pub mod shop;

use chrono::{DateTime, Utc};
use murick_core::{SaleFilter, SaleRecord, ShopContext, UNKNOWN_LABEL};

use crate::cli::{Command, FilterArgs, Period};
use crate::error::{ApiError, CliResult};
use crate::output::CommandOutput;
use crate::state::AppState;

/// Runs one parsed command against the shop in `state`.
pub async fn dispatch(state: &AppState, command: Command) -> CliResult<CommandOutput> {
    match command {
        Command::Inventory(cmd) => inventory::run(state, cmd).await,
        Command::Sale(cmd) => sale::run(state, cmd).await,
        Command::Report(cmd) => report::run(state, cmd).await,
        Command::Export(cmd) => export::run(state, cmd).await,
        Command::Shop(cmd) => shop::run(state, cmd).await,
        Command::Catalog => catalog::run(),
    }
}

/// Turns `--period`/`--from`/`--to`/`--customer` into a filter.
pub fn sale_filter(args: &FilterArgs, now: DateTime<Utc>) -> CliResult<SaleFilter> {
    let filter = match args.period {
        Some(Period::Today) => SaleFilter::today(now),
        Some(Period::Week) => SaleFilter::last_days(now, 7),
        Some(Period::Month) => SaleFilter::this_month(now),
        Some(Period::All) => SaleFilter::all(),
        None => {
            if let (Some(from), Some(to)) = (args.from, args.to) {
                if from > to {
                    return Err(ApiError::validation(format!(
                        "--from {} is after --to {}",
                        from, to
                    )));
                }
            }
            SaleFilter::for_dates(args.from, args.to)
        }
    };

    Ok(match &args.customer {
        Some(customer) => filter.with_customer(customer.clone()),
        None => filter,
    })
}

/// What to call the battery of a sale in listings.
///
/// The current SKU label when the SKU still exists. Otherwise `Unknown`,
/// followed by the description stored on the sale if there is one.
pub fn sale_item_label(shop: &ShopContext, sale: &SaleRecord) -> String {
    match shop.ledger.get(&sale.battery_id) {
        Some(sku) => sku.label(),
        None => match sale.snapshot_label() {
            Some(sold_as) => format!("{} (sold as {})", UNKNOWN_LABEL, sold_as),
            None => UNKNOWN_LABEL.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use murick_core::{Money, NewBatterySku, SaleRequest};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_period_overrides_dates() {
        let args = FilterArgs {
            period: Some(Period::Today),
            from: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..Default::default()
        };
        assert_eq!(sale_filter(&args, now()).unwrap(), SaleFilter::today(now()));
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let args = FilterArgs {
            from: NaiveDate::from_ymd_opt(2024, 2, 1),
            to: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert!(sale_filter(&args, now()).is_err());
    }

    #[test]
    fn test_customer_filter() {
        let args = FilterArgs {
            customer: Some("ahmed".to_string()),
            ..Default::default()
        };
        let filter = sale_filter(&args, now()).unwrap();
        assert!(filter.is_unbounded());
        assert_eq!(filter.customer.as_deref(), Some("ahmed"));
    }

    #[test]
    fn test_removed_sku_label() {
        let mut shop = ShopContext::new("main").unwrap();
        let sku = shop
            .add_sku(NewBatterySku::new(
                "AGS",
                "55Ah",
                "N50",
                Money::from_rupees(8_000),
                Money::from_rupees(10_000),
                2,
            ))
            .unwrap();
        let sale = shop
            .record_sale(SaleRequest::new(&sku.id, 1, Money::from_rupees(10_000), "owner"))
            .unwrap();

        assert_eq!(sale_item_label(&shop, &sale), "AGS 55Ah N50");
        shop.remove_sku(&sku.id).unwrap();
        assert_eq!(sale_item_label(&shop, &sale), "Unknown (sold as AGS 55Ah N50)");
    }
}

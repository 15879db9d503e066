//! Command-line definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "murick")]
#[command(about = "Inventory, sales and reports for a battery shop")]
#[command(version)]
pub struct Cli {
    /// Config file (default: murick.toml in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Shop to operate on (default: shop.id from the config)
    #[arg(long, global = true)]
    pub shop: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage battery SKUs and stock
    #[command(subcommand)]
    Inventory(InventoryCommand),

    /// Record and look up sales
    #[command(subcommand)]
    Sale(SaleCommand),

    /// Sales and stock analytics
    #[command(subcommand)]
    Report(ReportCommand),

    /// Write CSV reports
    #[command(subcommand)]
    Export(ExportCommand),

    /// Shop header printed on receipts and reports
    #[command(subcommand)]
    Shop(ShopCommand),

    /// Known battery brands and capacities
    Catalog,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// Add a new SKU
    Add(AddSkuArgs),

    /// List SKUs
    List {
        /// Only SKUs with stock on hand
        #[arg(long)]
        in_stock: bool,
    },

    /// Change fields of an existing SKU
    Update(UpdateSkuArgs),

    /// Remove a SKU (its past sales are kept)
    Remove { id: String },

    /// SKUs at or below their low-stock alert
    LowStock,
}

/// Prices accept `12000`, `12,000.50` or `Rs 12,000`.
#[derive(Debug, Args)]
pub struct AddSkuArgs {
    #[arg(long)]
    pub brand: String,

    #[arg(long)]
    pub capacity: String,

    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub purchase_price: String,

    #[arg(long)]
    pub selling_price: String,

    #[arg(long)]
    pub stock: String,

    #[arg(long)]
    pub low_stock_alert: Option<String>,

    #[arg(long)]
    pub warranty_months: Option<u32>,

    #[arg(long)]
    pub supplier: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateSkuArgs {
    pub id: String,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub capacity: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub purchase_price: Option<String>,

    #[arg(long)]
    pub selling_price: Option<String>,

    /// New absolute stock level
    #[arg(long)]
    pub stock: Option<String>,

    #[arg(long)]
    pub low_stock_alert: Option<String>,

    #[arg(long)]
    pub warranty_months: Option<u32>,

    #[arg(long, conflicts_with = "clear_supplier")]
    pub supplier: Option<String>,

    /// Remove the supplier
    #[arg(long)]
    pub clear_supplier: bool,
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum SaleCommand {
    /// Record a sale and debit stock
    Record(RecordSaleArgs),

    /// List sales, newest first
    List(FilterArgs),

    /// Print the receipt for a sale
    Receipt {
        sale_id: String,

        /// Characters per line (default: receipt.paper_width)
        #[arg(long)]
        width: Option<usize>,
    },
}

#[derive(Debug, Args)]
pub struct RecordSaleArgs {
    /// SKU id
    #[arg(long)]
    pub sku: String,

    #[arg(long)]
    pub qty: String,

    /// Unit price (default: the SKU's selling price)
    #[arg(long)]
    pub price: Option<String>,

    /// Customer name (default: walk-in)
    #[arg(long)]
    pub customer: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Operator (default: shop.operator)
    #[arg(long)]
    pub sold_by: Option<String>,

    /// Print the receipt after recording
    #[arg(long)]
    pub receipt: bool,
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Stock value, sales totals, top sellers and low stock
    Dashboard(FilterArgs),

    /// Best-selling SKUs by quantity
    TopSellers {
        #[arg(long, default_value_t = 5)]
        limit: usize,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Sales grouped by brand
    Brands(FilterArgs),

    /// Totals for the selected sales
    Summary(FilterArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    Today,
    Week,
    Month,
    All,
}

/// Sale selection shared by listings, reports and exports.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Preset range; overrides --from/--to
    #[arg(long, value_enum)]
    pub period: Option<Period>,

    /// First day, `YYYY-MM-DD` or `DD/MM/YYYY`
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Customer name contains (case-insensitive)
    #[arg(long)]
    pub customer: Option<String>,
}

pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD or DD/MM/YYYY", input))
}

// =============================================================================
// Export / Shop
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Inventory report with valuation summary
    Inventory {
        /// Output file (default: <Shop_Name>_Inventory_<date>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Sales report for the selected period
    Sales {
        #[arg(long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum ShopCommand {
    /// Show the shop header
    Show,

    /// Change header fields; omitted fields keep their value
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        proprietor: Option<String>,

        #[arg(long)]
        contact: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// Pass an empty string to clear
        #[arg(long)]
        email: Option<String>,
    },

    /// Shops present in the database
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sale_record() {
        let cli = Cli::try_parse_from([
            "murick", "--shop", "branch", "sale", "record", "--sku", "abc", "--qty", "2",
            "--customer", "Ahmed",
        ])
        .unwrap();

        assert_eq!(cli.shop.as_deref(), Some("branch"));
        match cli.command {
            Command::Sale(SaleCommand::Record(args)) => {
                assert_eq!(args.sku, "abc");
                assert_eq!(args.qty, "2");
                assert_eq!(args.customer.as_deref(), Some("Ahmed"));
                assert!(args.price.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_filter_dates() {
        let cli = Cli::try_parse_from([
            "murick", "report", "summary", "--from", "01/01/2024", "--to", "2024-01-31", "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Report(ReportCommand::Summary(filter)) => {
                assert_eq!(filter.from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(filter.to, NaiveDate::from_ymd_opt(2024, 1, 31));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(parse_date("31-01-2024").is_err());
    }

    #[test]
    fn test_supplier_flags_conflict() {
        let result = Cli::try_parse_from([
            "murick", "inventory", "update", "abc", "--supplier", "X", "--clear-supplier",
        ]);
        assert!(result.is_err());
    }
}

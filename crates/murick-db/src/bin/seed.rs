//! # Seed Data Generator
//!
//! Stocks a shop with demo batteries for development.
//!
//! ## Usage
//! ```bash
//! # Seed the "main" shop in ./murick_dev.db
//! cargo run -p murick-db --bin seed
//!
//! # Another shop or database
//! cargo run -p murick-db --bin seed -- --shop branch --db ./data/murick.db
//! ```
//!
//! One SKU per catalog brand and capacity, with prices scaled by capacity
//! and a handful of sales so the dashboard has something to show.

use murick_core::catalog::{BATTERY_BRANDS, BATTERY_CAPACITIES};
use murick_core::{Money, NewBatterySku, SaleRequest, DEFAULT_SHOP_ID};
use murick_db::{Database, DbConfig};
use std::env;

/// Purchase price per Ah, in rupees, before the brand premium.
const RUPEES_PER_AH: i64 = 150;

/// Selling markup over purchase, in percent.
const MARKUPS: &[i64] = &[12, 15, 18, 20];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = "./murick_dev.db".to_string();
    let mut shop_id = DEFAULT_SHOP_ID.to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--shop" | "-s" => {
                if i + 1 < args.len() {
                    shop_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Murick Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./murick_dev.db)");
                println!("  -s, --shop <ID>    Shop to seed (default: {})", DEFAULT_SHOP_ID);
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Murick Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Shop:     {}", shop_id);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let shops = db.shops();
    let existing = shops.snapshot(&shop_id).await?;
    if !existing.ledger.is_empty() {
        println!("⚠ Shop already has {} SKUs", existing.ledger.len());
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Adding batteries...");
    let start = std::time::Instant::now();
    let mut added = Vec::new();

    for (brand_idx, brand) in BATTERY_BRANDS.iter().enumerate() {
        for (cap_idx, capacity) in BATTERY_CAPACITIES.iter().enumerate() {
            let seed = brand_idx * BATTERY_CAPACITIES.len() + cap_idx;
            let input = generate_sku(brand.name, capacity, brand.popular, seed);
            match shops.add_sku(&shop_id, input).await {
                Ok(sku) => added.push(sku),
                Err(e) => eprintln!("Failed to add {} {}: {}", brand.name, capacity, e),
            }
        }
    }
    println!("✓ Added {} SKUs in {:?}", added.len(), start.elapsed());

    println!();
    println!("Recording sample sales...");
    let mut sold = 0;
    for (idx, sku) in added.iter().enumerate().step_by(7) {
        let quantity = 1 + (idx % 3) as i64;
        if sku.stock_quantity < quantity {
            continue;
        }
        let mut request = SaleRequest::new(&sku.id, quantity, sku.selling_price, "seed");
        if idx % 2 == 0 {
            request = request.with_customer(format!("Customer {}", idx), None);
        }
        match shops.record_sale(&shop_id, request).await {
            Ok(_) => sold += 1,
            Err(e) => eprintln!("Failed to sell {}: {}", sku.label(), e),
        }
    }
    println!("✓ Recorded {} sales", sold);

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

fn generate_sku(brand: &str, capacity: &str, popular: bool, seed: usize) -> NewBatterySku {
    let ah: i64 = capacity.trim_end_matches("Ah").parse().unwrap_or(50);

    // popular brands carry a 10% premium
    let base = ah * RUPEES_PER_AH;
    let purchase = if popular { base + base / 10 } else { base };
    let markup = MARKUPS[seed % MARKUPS.len()];
    let selling = purchase + purchase * markup / 100;

    let initial = brand.chars().next().unwrap_or('X').to_ascii_uppercase();
    let model = format!("{}{}", initial, ah);
    let stock = (seed % 16) as i64;

    NewBatterySku::new(
        brand,
        capacity,
        model,
        Money::from_rupees(purchase),
        Money::from_rupees(selling),
        stock,
    )
    .with_warranty_months(if ah >= 100 { 18 } else { 12 })
    .with_supplier(format!("{} Distributors", brand))
}

//! # Shop Context
//!
//! One shop's complete state: configuration, inventory ledger and sales log.
//!
//! ```text
//! ┌───────────────────────── ShopContext ──────────────────────────┐
//! │  shop_id   "main"                                              │
//! │  config    ShopConfig      (receipt / report header)           │
//! │  ledger    InventoryLedger (SKUs + stock)                      │
//! │  sales     SalesLog        (append-only)                       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Contexts are never shared between shops. The storage layer builds one with
//! [`ShopContext::from_records`], lets a single operation mutate it, and
//! writes the collections back.

use serde_json::Value;
use tracing::debug;

use crate::analytics::Analytics;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::ledger::InventoryLedger;
use crate::sales::SalesLog;
use crate::types::{BatterySku, NewBatterySku, SaleRecord, SaleRequest, ShopConfig, SkuPatch};
use crate::validation::{normalize_optional_text, validate_required_text, validate_shop_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopContext {
    pub shop_id: String,
    pub config: ShopConfig,
    pub ledger: InventoryLedger,
    pub sales: SalesLog,
}

impl ShopContext {
    /// An empty shop with the default configuration.
    pub fn new(shop_id: impl Into<String>) -> CoreResult<Self> {
        let shop_id = shop_id.into();
        validate_shop_id(&shop_id)?;
        Ok(Self {
            shop_id,
            config: ShopConfig::default(),
            ledger: InventoryLedger::new(),
            sales: SalesLog::new(),
        })
    }

    /// Parses stored collections into a validated context.
    ///
    /// `config` holds zero or one record; zero means the shop has never been
    /// configured and gets the default header.
    pub fn from_records(
        shop_id: impl Into<String>,
        config: Vec<Value>,
        inventory: Vec<Value>,
        sales: Vec<Value>,
    ) -> CoreResult<Self> {
        let shop_id = shop_id.into();
        validate_shop_id(&shop_id)?;

        let config = match config.len() {
            0 => ShopConfig::default(),
            1 => {
                let parsed: Vec<ShopConfig> = decode("shop_config", config)?;
                let mut iter = parsed.into_iter();
                iter.next().unwrap_or_default()
            }
            n => {
                return Err(ValidationError::MalformedRecord {
                    collection: "shop_config".to_string(),
                    index: 1,
                    reason: format!("expected a single record, found {}", n),
                }
                .into())
            }
        };

        let skus: Vec<BatterySku> = decode("inventory", inventory)?;
        let records: Vec<SaleRecord> = decode("sales", sales)?;

        let context = Self {
            shop_id,
            config,
            ledger: InventoryLedger::from_skus(skus)?,
            sales: SalesLog::from_records(records)?,
        };
        debug!(
            shop_id = %context.shop_id,
            skus = context.ledger.len(),
            sales = context.sales.len(),
            "Loaded shop context"
        );
        Ok(context)
    }

    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(&self.ledger, &self.sales)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub fn add_sku(&mut self, input: NewBatterySku) -> CoreResult<BatterySku> {
        self.ledger.add_sku(input)
    }

    pub fn update_sku(&mut self, id: &str, patch: SkuPatch) -> CoreResult<BatterySku> {
        self.ledger.update_sku(id, patch)
    }

    pub fn remove_sku(&mut self, id: &str) -> CoreResult<BatterySku> {
        self.ledger.remove_sku(id)
    }

    pub fn record_sale(&mut self, request: SaleRequest) -> CoreResult<SaleRecord> {
        self.sales.record(&mut self.ledger, request)
    }

    /// Replaces the shop header after validating the required fields.
    pub fn set_config(&mut self, config: ShopConfig) -> CoreResult<ShopConfig> {
        let config = ShopConfig {
            shop_name: validate_required_text("shop_name", &config.shop_name)?,
            proprietor_name: config.proprietor_name.trim().to_string(),
            contact_number: config.contact_number.trim().to_string(),
            address: config.address.trim().to_string(),
            email: normalize_optional_text("email", config.email)?,
        };
        self.config = config.clone();
        Ok(config)
    }
}

fn decode<T: serde::de::DeserializeOwned>(collection: &str, values: Vec<Value>) -> CoreResult<Vec<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|e| {
                CoreError::from(ValidationError::MalformedRecord {
                    collection: collection.to_string(),
                    index,
                    reason: e.to_string(),
                })
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use serde_json::json;

    fn sku_json(id: &str, stock: i64) -> Value {
        json!({
            "id": id,
            "brand": "AGS",
            "capacity": "55Ah",
            "model": "N50",
            "purchase_price": 800_000,
            "selling_price": 1_000_000,
            "stock_quantity": stock,
            "low_stock_alert": 5,
            "warranty_months": 12,
            "supplier": null,
            "date_added": "2024-01-01T09:00:00Z"
        })
    }

    #[test]
    fn test_new_rejects_bad_shop_id() {
        assert!(ShopContext::new("main").is_ok());
        assert!(ShopContext::new("").is_err());
        assert!(ShopContext::new("a b").is_err());
    }

    #[test]
    fn test_from_records_empty_uses_defaults() {
        let ctx = ShopContext::from_records("main", vec![], vec![], vec![]).unwrap();
        assert_eq!(ctx.config, ShopConfig::default());
        assert!(ctx.ledger.is_empty());
        assert!(ctx.sales.is_empty());
    }

    #[test]
    fn test_from_records_parses_legacy_sale() {
        // no snapshot, operator or warranty fields; null customer
        let sale = json!({
            "id": "s1",
            "battery_id": "b1",
            "quantity_sold": 2,
            "unit_price": 1_000_000,
            "total_amount": 2_000_000,
            "profit_per_unit": 200_000,
            "total_profit": 400_000,
            "customer_name": null,
            "customer_phone": null,
            "sale_date": "2024-01-02T10:00:00Z"
        });
        let ctx =
            ShopContext::from_records("main", vec![], vec![sku_json("b1", 3)], vec![sale]).unwrap();
        let record = &ctx.sales.records()[0];
        assert_eq!(record.brand, "");
        assert_eq!(record.customer_name, "Walk-in Customer");
        assert_eq!(record.sold_by, "");
        assert_eq!(record.warranty_end_date, None);
    }

    #[test]
    fn test_from_records_rejects_malformed() {
        let bad_shape = json!({ "id": "b1", "brand": "AGS" });
        let err = ShopContext::from_records("main", vec![], vec![bad_shape], vec![]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MalformedRecord { index: 0, .. })
        ));

        let negative = sku_json("b1", -2);
        assert!(ShopContext::from_records("main", vec![], vec![negative], vec![]).is_err());

        let two_configs = vec![json!({"shop_name": "A"}), json!({"shop_name": "B"})];
        assert!(ShopContext::from_records("main", two_configs, vec![], vec![]).is_err());
    }

    #[test]
    fn test_operations_round_trip_through_context() {
        let mut ctx = ShopContext::new("main").unwrap();
        let sku = ctx
            .add_sku(NewBatterySku::new(
                "Exide",
                "70Ah",
                "NS70",
                Money::from_rupees(12_000),
                Money::from_rupees(14_500),
                4,
            ))
            .unwrap();
        let sale = ctx
            .record_sale(SaleRequest::new(&sku.id, 1, Money::from_rupees(14_500), "owner"))
            .unwrap();

        let config = ctx
            .set_config(ShopConfig {
                shop_name: "  Murick Batteries ".to_string(),
                email: Some(" ".to_string()),
                ..ShopConfig::default()
            })
            .unwrap();
        assert_eq!(config.shop_name, "Murick Batteries");
        assert_eq!(config.email, None);

        let inventory: Vec<Value> = ctx
            .ledger
            .list_skus()
            .iter()
            .map(|s| serde_json::to_value(s).unwrap())
            .collect();
        let sales: Vec<Value> = ctx
            .sales
            .records()
            .iter()
            .map(|s| serde_json::to_value(s).unwrap())
            .collect();
        let stored_config = vec![serde_json::to_value(&ctx.config).unwrap()];

        let reloaded = ShopContext::from_records("main", stored_config, inventory, sales).unwrap();
        assert_eq!(reloaded, ctx);
        assert_eq!(reloaded.ledger.get(&sku.id).unwrap().stock_quantity, 3);
        assert_eq!(reloaded.sales.get(&sale.id), Some(&sale));
        assert_eq!(
            reloaded.analytics().sales_summary(&Default::default()).total_transactions,
            1
        );
    }

    #[test]
    fn test_set_config_requires_name() {
        let mut ctx = ShopContext::new("main").unwrap();
        let err = ctx
            .set_config(ShopConfig {
                shop_name: " ".to_string(),
                ..ShopConfig::default()
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));
        assert_eq!(ctx.config, ShopConfig::default());
    }
}

//! # Inventory Ledger
//!
//! Owns one shop's battery SKUs and their stock levels.
//!
//! ## Stock Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   add_sku ──► stock = initial                                           │
//! │                   │                                                     │
//! │                   ├── update_sku (operator correction, any value >= 0)  │
//! │                   │                                                     │
//! │                   └── debit_stock (sales only, checked, one step)       │
//! │                                                                         │
//! │   Invariant: stock_quantity >= 0 for every SKU, always.                 │
//! │   There is no implicit restocking.                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation validates before touching state, so a returned error means
//! the ledger is exactly as it was.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{BatterySku, NewBatterySku, SkuPatch};
use crate::validation::{
    normalize_optional_text, validate_non_negative_count, validate_non_negative_money,
    validate_required_text,
};

/// Ordered collection of SKUs for one shop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryLedger {
    skus: Vec<BatterySku>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from stored SKUs, rejecting any record that breaks a
    /// ledger invariant or repeats an id.
    pub fn from_skus(skus: Vec<BatterySku>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(skus.len());
        for sku in &skus {
            validate_stored_sku(sku)?;
            if !seen.insert(sku.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "battery id".to_string(),
                    value: sku.id.clone(),
                }
                .into());
            }
        }
        Ok(Self { skus })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a SKU with a fresh id, stamped with the current time.
    pub fn add_sku(&mut self, input: NewBatterySku) -> CoreResult<BatterySku> {
        self.add_sku_at(input, Utc::now())
    }

    /// Adds a SKU with an explicit `date_added`.
    pub fn add_sku_at(
        &mut self,
        input: NewBatterySku,
        date_added: DateTime<Utc>,
    ) -> CoreResult<BatterySku> {
        let sku = BatterySku {
            id: Uuid::new_v4().to_string(),
            brand: validate_required_text("brand", &input.brand)?,
            capacity: validate_required_text("capacity", &input.capacity)?,
            model: validate_required_text("model", &input.model)?,
            purchase_price: input.purchase_price,
            selling_price: input.selling_price,
            stock_quantity: input.stock_quantity,
            low_stock_alert: input.low_stock_alert,
            warranty_months: input.warranty_months,
            supplier: normalize_optional_text("supplier", input.supplier)?,
            date_added,
        };
        validate_amounts(&sku)?;

        debug!(id = %sku.id, label = %sku.label(), stock = sku.stock_quantity, "Adding SKU");
        self.skus.push(sku.clone());
        Ok(sku)
    }

    /// Applies a partial update in place. `id` and `date_added` never change.
    ///
    /// The patched SKU is validated as a whole before it replaces the old one.
    pub fn update_sku(&mut self, id: &str, patch: SkuPatch) -> CoreResult<BatterySku> {
        let index = self.position(id)?;
        let mut updated = self.skus[index].clone();

        if let Some(brand) = patch.brand {
            updated.brand = validate_required_text("brand", &brand)?;
        }
        if let Some(capacity) = patch.capacity {
            updated.capacity = validate_required_text("capacity", &capacity)?;
        }
        if let Some(model) = patch.model {
            updated.model = validate_required_text("model", &model)?;
        }
        if let Some(price) = patch.purchase_price {
            updated.purchase_price = price;
        }
        if let Some(price) = patch.selling_price {
            updated.selling_price = price;
        }
        if let Some(stock) = patch.stock_quantity {
            updated.stock_quantity = stock;
        }
        if let Some(alert) = patch.low_stock_alert {
            updated.low_stock_alert = alert;
        }
        if let Some(months) = patch.warranty_months {
            updated.warranty_months = months;
        }
        if let Some(supplier) = patch.supplier {
            updated.supplier = normalize_optional_text("supplier", supplier)?;
        }
        validate_amounts(&updated)?;

        debug!(id, stock = updated.stock_quantity, "Updating SKU");
        self.skus[index] = updated.clone();
        Ok(updated)
    }

    /// Decrements stock by `quantity` after checking availability.
    ///
    /// This is the only path by which a sale lowers stock. A non-positive
    /// quantity is reported as [`CoreError::InsufficientStock`] like an
    /// oversell, and nothing changes.
    pub fn debit_stock(&mut self, id: &str, quantity: i64) -> CoreResult<BatterySku> {
        let index = self.position(id)?;
        let sku = &mut self.skus[index];

        if quantity <= 0 || quantity > sku.stock_quantity {
            return Err(CoreError::InsufficientStock {
                sku: sku.id.clone(),
                available: sku.stock_quantity,
                requested: quantity,
            });
        }

        sku.stock_quantity -= quantity;
        debug!(id, quantity, remaining = sku.stock_quantity, "Debited stock");
        Ok(sku.clone())
    }

    /// Removes a SKU. Sale records that reference it are left as they are.
    pub fn remove_sku(&mut self, id: &str) -> CoreResult<BatterySku> {
        let index = self.position(id)?;
        let removed = self.skus.remove(index);
        debug!(id, label = %removed.label(), "Removed SKU");
        Ok(removed)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All SKUs in insertion order.
    pub fn list_skus(&self) -> &[BatterySku] {
        &self.skus
    }

    pub fn get(&self, id: &str) -> Option<&BatterySku> {
        self.skus.iter().find(|sku| sku.id == id)
    }

    /// SKUs that can currently be sold.
    pub fn in_stock_skus(&self) -> Vec<&BatterySku> {
        self.skus.iter().filter(|sku| sku.stock_quantity > 0).collect()
    }

    pub fn len(&self) -> usize {
        self.skus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skus.is_empty()
    }

    fn position(&self, id: &str) -> CoreResult<usize> {
        self.skus
            .iter()
            .position(|sku| sku.id == id)
            .ok_or_else(|| CoreError::SkuNotFound(id.to_string()))
    }
}

// =============================================================================
// Invariant Checks
// =============================================================================

fn validate_amounts(sku: &BatterySku) -> Result<(), ValidationError> {
    validate_non_negative_money("purchase_price", sku.purchase_price)?;
    validate_non_negative_money("selling_price", sku.selling_price)?;
    validate_non_negative_count("stock_quantity", sku.stock_quantity)?;
    validate_non_negative_count("low_stock_alert", sku.low_stock_alert)?;
    // Valuation multiplies each price by the stock on hand.
    for (field, price) in [
        ("purchase_price", sku.purchase_price),
        ("selling_price", sku.selling_price),
    ] {
        if price.checked_multiply_quantity(sku.stock_quantity).is_none() {
            return Err(ValidationError::too_large(field));
        }
    }
    Ok(())
}

fn validate_stored_sku(sku: &BatterySku) -> Result<(), ValidationError> {
    validate_required_text("id", &sku.id)?;
    validate_required_text("brand", &sku.brand)?;
    validate_required_text("capacity", &sku.capacity)?;
    validate_required_text("model", &sku.model)?;
    validate_amounts(sku)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn ags(stock: i64) -> NewBatterySku {
        NewBatterySku::new(
            "AGS",
            "55Ah",
            "N50",
            Money::from_rupees(8_000),
            Money::from_rupees(10_000),
            stock,
        )
    }

    #[test]
    fn test_add_sku_assigns_id_and_defaults() {
        let mut ledger = InventoryLedger::new();
        let sku = ledger.add_sku(ags(10)).unwrap();

        assert!(uuid::Uuid::parse_str(&sku.id).is_ok());
        assert_eq!(sku.low_stock_alert, 5);
        assert_eq!(sku.warranty_months, 12);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(&sku.id), Some(&sku));
    }

    #[test]
    fn test_add_sku_rejects_invalid_input() {
        let mut ledger = InventoryLedger::new();

        let mut blank_brand = ags(1);
        blank_brand.brand = "  ".to_string();
        assert!(matches!(
            ledger.add_sku(blank_brand),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let mut negative_price = ags(1);
        negative_price.purchase_price = Money::from_paisa(-1);
        assert!(ledger.add_sku(negative_price).is_err());

        assert!(ledger.add_sku(ags(-1)).is_err());
        assert!(ledger.add_sku(ags(1).with_low_stock_alert(-2)).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_stock_value_must_fit() {
        let mut ledger = InventoryLedger::new();
        let huge = Money::from_paisa(i64::MAX / 50);

        let err = ledger
            .add_sku(NewBatterySku::new("AGS", "55Ah", "N50", Money::zero(), huge, 100))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation(ValidationError::TooLarge {
                field: "selling_price".to_string()
            })
        );
        assert!(ledger.is_empty());

        let sku = ledger
            .add_sku(NewBatterySku::new("AGS", "55Ah", "N50", huge, huge, 50))
            .unwrap();
        let before = ledger.clone();
        let patch = SkuPatch {
            stock_quantity: Some(51),
            ..Default::default()
        };
        assert!(matches!(
            ledger.update_sku(&sku.id, patch),
            Err(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_duplicate_triples_are_distinct_skus() {
        let mut ledger = InventoryLedger::new();
        let a = ledger.add_sku(ags(1)).unwrap();
        let b = ledger.add_sku(ags(1)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_update_sku_preserves_identity() {
        let mut ledger = InventoryLedger::new();
        let sku = ledger.add_sku(ags(10)).unwrap();

        let patch = SkuPatch {
            selling_price: Some(Money::from_rupees(11_000)),
            stock_quantity: Some(3),
            supplier: Some(Some("Ali Traders".to_string())),
            ..Default::default()
        };
        let updated = ledger.update_sku(&sku.id, patch).unwrap();

        assert_eq!(updated.id, sku.id);
        assert_eq!(updated.date_added, sku.date_added);
        assert_eq!(updated.selling_price, Money::from_rupees(11_000));
        assert_eq!(updated.stock_quantity, 3);
        assert_eq!(updated.supplier.as_deref(), Some("Ali Traders"));

        let cleared = ledger
            .update_sku(
                &sku.id,
                SkuPatch {
                    supplier: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.supplier, None);
    }

    #[test]
    fn test_update_sku_invalid_patch_leaves_ledger_unchanged() {
        let mut ledger = InventoryLedger::new();
        let sku = ledger.add_sku(ags(10)).unwrap();
        let before = ledger.clone();

        let patch = SkuPatch {
            brand: Some("Exide".to_string()),
            stock_quantity: Some(-4),
            ..Default::default()
        };
        assert!(ledger.update_sku(&sku.id, patch).is_err());
        assert_eq!(ledger, before);

        assert!(matches!(
            ledger.update_sku("missing", SkuPatch::default()),
            Err(CoreError::SkuNotFound(_))
        ));
    }

    #[test]
    fn test_debit_stock() {
        let mut ledger = InventoryLedger::new();
        let sku = ledger.add_sku(ags(10)).unwrap();

        let after = ledger.debit_stock(&sku.id, 3).unwrap();
        assert_eq!(after.stock_quantity, 7);

        let after = ledger.debit_stock(&sku.id, 7).unwrap();
        assert_eq!(after.stock_quantity, 0);
    }

    #[test]
    fn test_debit_stock_rejects_oversell_and_non_positive() {
        let mut ledger = InventoryLedger::new();
        let sku = ledger.add_sku(ags(2)).unwrap();

        for qty in [3, 0, -1] {
            let err = ledger.debit_stock(&sku.id, qty).unwrap_err();
            assert_eq!(
                err,
                CoreError::InsufficientStock {
                    sku: sku.id.clone(),
                    available: 2,
                    requested: qty,
                }
            );
        }
        assert_eq!(ledger.get(&sku.id).unwrap().stock_quantity, 2);
        assert!(matches!(
            ledger.debit_stock("missing", 1),
            Err(CoreError::SkuNotFound(_))
        ));
    }

    #[test]
    fn test_remove_and_in_stock() {
        let mut ledger = InventoryLedger::new();
        let a = ledger.add_sku(ags(0)).unwrap();
        let b = ledger.add_sku(ags(4)).unwrap();

        let in_stock: Vec<&str> = ledger.in_stock_skus().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(in_stock, vec![b.id.as_str()]);

        let removed = ledger.remove_sku(&a.id).unwrap();
        assert_eq!(removed.id, a.id);
        assert!(ledger.get(&a.id).is_none());
        assert!(matches!(ledger.remove_sku(&a.id), Err(CoreError::SkuNotFound(_))));
    }

    #[test]
    fn test_from_skus_validates_records() {
        let mut ledger = InventoryLedger::new();
        let sku = ledger.add_sku(ags(3)).unwrap();

        assert!(InventoryLedger::from_skus(vec![sku.clone()]).is_ok());

        let mut negative = sku.clone();
        negative.stock_quantity = -1;
        assert!(InventoryLedger::from_skus(vec![negative]).is_err());

        let duplicate = InventoryLedger::from_skus(vec![sku.clone(), sku]);
        assert!(matches!(
            duplicate,
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
    }
}

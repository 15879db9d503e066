//! # Sales Recorder
//!
//! Appends immutable sale records and debits the inventory ledger.
//!
//! ## Recording Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleRequest                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Look up SKU ─────────────────► SkuNotFound                          │
//! │  2. 1 <= qty <= stock ───────────► InsufficientStock                    │
//! │  3. unit_price >= 0, sold_by ────► Validation                           │
//! │  4. Totals from current purchase price ──► Validation (too large)       │
//! │  5. ledger.debit_stock ──────────► (error: nothing appended)            │
//! │  6. Append record                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleRecord                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no void or undo: a recorded sale stays recorded.

use chrono::{DateTime, Months, Utc};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::filter::SaleFilter;
use crate::ledger::InventoryLedger;
use crate::types::{SaleRecord, SaleRequest, WALK_IN_CUSTOMER};
use crate::validation::{normalize_optional_text, validate_non_negative_money, validate_required_text};

/// Append-only log of one shop's sales.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesLog {
    records: Vec<SaleRecord>,
}

impl SalesLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from stored records.
    ///
    /// Rejects records whose quantity or price is out of range, whose totals
    /// disagree with quantity × unit price, or whose id repeats.
    pub fn from_records(records: Vec<SaleRecord>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            validate_stored_record(index, record)?;
            if !seen.insert(record.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "sale id".to_string(),
                    value: record.id.clone(),
                }
                .into());
            }
        }
        Ok(Self { records })
    }

    /// Records a sale dated now.
    pub fn record(
        &mut self,
        ledger: &mut InventoryLedger,
        request: SaleRequest,
    ) -> CoreResult<SaleRecord> {
        self.record_at(ledger, request, Utc::now())
    }

    /// Records a sale with an explicit sale date.
    pub fn record_at(
        &mut self,
        ledger: &mut InventoryLedger,
        request: SaleRequest,
        sale_date: DateTime<Utc>,
    ) -> CoreResult<SaleRecord> {
        let sku = ledger
            .get(&request.battery_id)
            .ok_or_else(|| CoreError::SkuNotFound(request.battery_id.clone()))?;

        if request.quantity_sold < 1 || request.quantity_sold > sku.stock_quantity {
            return Err(CoreError::InsufficientStock {
                sku: sku.id.clone(),
                available: sku.stock_quantity,
                requested: request.quantity_sold,
            });
        }

        validate_non_negative_money("unit_price", request.unit_price)?;
        let sold_by = validate_required_text("sold_by", &request.sold_by)?;
        let customer_name = normalize_optional_text("customer_name", request.customer_name)?
            .unwrap_or_else(|| WALK_IN_CUSTOMER.to_string());
        let customer_phone = normalize_optional_text("customer_phone", request.customer_phone)?;

        let quantity = request.quantity_sold;
        let profit_per_unit = request.unit_price - sku.purchase_price;
        let total_amount = request
            .unit_price
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| ValidationError::too_large("total_amount"))?;
        let total_profit = profit_per_unit
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| ValidationError::too_large("total_profit"))?;
        let warranty_end_date = if sku.warranty_months > 0 {
            sale_date.checked_add_months(Months::new(sku.warranty_months))
        } else {
            None
        };

        let record = SaleRecord {
            id: Uuid::new_v4().to_string(),
            battery_id: sku.id.clone(),
            brand: sku.brand.clone(),
            capacity: sku.capacity.clone(),
            model: sku.model.clone(),
            quantity_sold: quantity,
            unit_price: request.unit_price,
            total_amount,
            profit_per_unit,
            total_profit,
            customer_name,
            customer_phone,
            warranty_end_date,
            sale_date,
            sold_by,
        };

        ledger.debit_stock(&record.battery_id, quantity)?;

        debug!(
            sale_id = %record.id,
            battery_id = %record.battery_id,
            quantity,
            total = %record.total_amount,
            "Recorded sale"
        );
        self.records.push(record.clone());
        Ok(record)
    }

    /// All records in the order they were recorded.
    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&SaleRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Records matching `filter`, in recording order.
    pub fn filtered<'a>(&'a self, filter: &'a SaleFilter) -> impl Iterator<Item = &'a SaleRecord> + 'a {
        self.records.iter().filter(move |record| filter.matches(record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn validate_stored_record(index: usize, record: &SaleRecord) -> Result<(), ValidationError> {
    let malformed = |reason: String| ValidationError::MalformedRecord {
        collection: "sales".to_string(),
        index,
        reason,
    };

    if record.id.trim().is_empty() {
        return Err(malformed("missing id".to_string()));
    }
    if record.quantity_sold < 1 {
        return Err(malformed(format!(
            "quantity_sold must be at least 1, got {}",
            record.quantity_sold
        )));
    }
    validate_non_negative_money("unit_price", record.unit_price)?;
    if record.unit_price.checked_multiply_quantity(record.quantity_sold) != Some(record.total_amount) {
        return Err(malformed("total_amount does not equal unit_price × quantity_sold".to_string()));
    }
    if record.profit_per_unit.checked_multiply_quantity(record.quantity_sold)
        != Some(record.total_profit)
    {
        return Err(malformed(
            "total_profit does not equal profit_per_unit × quantity_sold".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::NewBatterySku;
    use chrono::TimeZone;

    fn setup(stock: i64) -> (InventoryLedger, String) {
        let mut ledger = InventoryLedger::new();
        let sku = ledger
            .add_sku(NewBatterySku::new(
                "AGS",
                "55Ah",
                "N50",
                Money::from_rupees(8_000),
                Money::from_rupees(10_000),
                stock,
            ))
            .unwrap();
        (ledger, sku.id)
    }

    #[test]
    fn test_record_sale_debits_and_computes_totals() {
        let (mut ledger, id) = setup(10);
        let mut sales = SalesLog::new();

        let record = sales
            .record(
                &mut ledger,
                SaleRequest::new(&id, 3, Money::from_rupees(10_000), "owner"),
            )
            .unwrap();

        assert_eq!(ledger.get(&id).unwrap().stock_quantity, 7);
        assert_eq!(record.total_amount, Money::from_rupees(30_000));
        assert_eq!(record.profit_per_unit, Money::from_rupees(2_000));
        assert_eq!(record.total_profit, Money::from_rupees(6_000));
        assert_eq!(record.customer_name, WALK_IN_CUSTOMER);
        assert_eq!(record.brand, "AGS");
        assert_eq!(sales.len(), 1);
        assert_eq!(sales.get(&record.id), Some(&record));
    }

    #[test]
    fn test_warranty_end_date() {
        let (mut ledger, id) = setup(5);
        let mut sales = SalesLog::new();
        let date = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();

        let record = sales
            .record_at(&mut ledger, SaleRequest::new(&id, 1, Money::from_rupees(9_000), "op"), date)
            .unwrap();
        assert_eq!(
            record.warranty_end_date,
            Some(Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_oversell_is_atomic() {
        let (mut ledger, id) = setup(2);
        let mut sales = SalesLog::new();
        let before = ledger.clone();

        let err = sales
            .record(&mut ledger, SaleRequest::new(&id, 3, Money::from_rupees(10_000), "op"))
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientStock {
                sku: id.clone(),
                available: 2,
                requested: 3,
            }
        );
        assert_eq!(ledger, before);
        assert!(sales.is_empty());
    }

    #[test]
    fn test_zero_quantity_is_insufficient_stock() {
        let (mut ledger, id) = setup(2);
        let mut sales = SalesLog::new();
        let err = sales
            .record(&mut ledger, SaleRequest::new(&id, 0, Money::from_rupees(1), "op"))
            .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { requested: 0, .. }));
    }

    #[test]
    fn test_validation_failures_do_not_mutate() {
        let (mut ledger, id) = setup(2);
        let mut sales = SalesLog::new();

        let negative = SaleRequest::new(&id, 1, Money::from_paisa(-1), "op");
        assert!(matches!(
            sales.record(&mut ledger, negative),
            Err(CoreError::Validation(_))
        ));

        let no_operator = SaleRequest::new(&id, 1, Money::from_rupees(1), "  ");
        assert!(matches!(
            sales.record(&mut ledger, no_operator),
            Err(CoreError::Validation(_))
        ));

        assert!(matches!(
            sales.record(&mut ledger, SaleRequest::new("nope", 1, Money::zero(), "op")),
            Err(CoreError::SkuNotFound(_))
        ));

        assert_eq!(ledger.get(&id).unwrap().stock_quantity, 2);
        assert!(sales.is_empty());
    }

    #[test]
    fn test_total_overflow_is_rejected_before_debit() {
        let (mut ledger, id) = setup(10);
        let mut sales = SalesLog::new();
        let before = ledger.clone();

        let err = sales
            .record(&mut ledger, SaleRequest::new(&id, 3, Money::from_paisa(i64::MAX / 2), "op"))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation(ValidationError::TooLarge {
                field: "total_amount".to_string()
            })
        );
        assert_eq!(ledger, before);
        assert!(sales.is_empty());

        let record = sales
            .record(&mut ledger, SaleRequest::new(&id, 2, Money::from_paisa(i64::MAX / 2), "op"))
            .unwrap();
        assert_eq!(record.total_amount.paisa(), i64::MAX - 1);
    }

    #[test]
    fn test_stored_record_with_overflowing_totals_is_malformed() {
        let (mut ledger, id) = setup(10);
        let mut sales = SalesLog::new();
        sales
            .record(&mut ledger, SaleRequest::new(&id, 1, Money::from_rupees(1), "op"))
            .unwrap();

        let mut records = sales.records().to_vec();
        records[0].quantity_sold = 4;
        records[0].unit_price = Money::from_paisa(i64::MAX / 2);
        records[0].total_amount = Money::from_paisa(i64::MAX);
        assert!(matches!(
            SalesLog::from_records(records),
            Err(CoreError::Validation(ValidationError::MalformedRecord { index: 0, .. }))
        ));
    }

    #[test]
    fn test_selling_below_cost_records_negative_profit() {
        let (mut ledger, id) = setup(2);
        let mut sales = SalesLog::new();
        let record = sales
            .record(
                &mut ledger,
                SaleRequest::new(&id, 2, Money::from_rupees(7_500), "op")
                    .with_customer("Ahmed", Some("0300-1234567".to_string())),
            )
            .unwrap();
        assert_eq!(record.profit_per_unit, Money::from_rupees(-500));
        assert_eq!(record.total_profit, Money::from_rupees(-1_000));
        assert_eq!(record.customer_name, "Ahmed");
        assert_eq!(record.customer_phone.as_deref(), Some("0300-1234567"));
    }

    #[test]
    fn test_filtered_and_from_records() {
        let (mut ledger, id) = setup(10);
        let mut sales = SalesLog::new();
        sales
            .record(
                &mut ledger,
                SaleRequest::new(&id, 1, Money::from_rupees(1), "op").with_customer("Bilal", None),
            )
            .unwrap();
        sales
            .record(&mut ledger, SaleRequest::new(&id, 1, Money::from_rupees(1), "op"))
            .unwrap();

        let filter = SaleFilter::all().with_customer("bil");
        assert_eq!(sales.filtered(&filter).count(), 1);

        let rebuilt = SalesLog::from_records(sales.records().to_vec()).unwrap();
        assert_eq!(rebuilt, sales);

        let mut broken = sales.records().to_vec();
        broken[0].total_amount = Money::from_rupees(99);
        assert!(matches!(
            SalesLog::from_records(broken),
            Err(CoreError::Validation(ValidationError::MalformedRecord { index: 0, .. }))
        ));
    }
}

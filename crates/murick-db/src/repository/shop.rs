//! # Shop Service
//!
//! Every state-changing operation on a shop runs as one exclusive
//! read-modify-write:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale("main", request)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock "main"            ← tokio Mutex, one per shop id                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN + claim write    ← no other writer can commit under us           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load inventory, sales, shop_config → ShopContext::from_records         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  context.record_sale(request)                                           │
//! │       │                                                                 │
//! │       ├── Err(CoreError) → ROLLBACK, nothing written                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  save changed collections → COMMIT → unlock                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two concurrent sales of the last unit therefore cannot both succeed, and
//! a reader never observes a debited stock without its sale record.

use murick_core::{
    BatterySku, CoreResult, NewBatterySku, SaleRecord, SaleRequest, ShopConfig, ShopContext,
    SkuPatch,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use super::collection::{load_in, save_in, Collection, CollectionStore};
use crate::error::{DbError, DbResult, ServiceResult};

// =============================================================================
// Per-shop Locks
// =============================================================================

/// One async mutex per shop id, created on first use.
#[derive(Debug, Clone, Default)]
pub struct ShopLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl ShopLocks {
    /// Waits until no other operation holds `shop_id`.
    pub async fn acquire(&self, shop_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            locks.entry(shop_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

// =============================================================================
// Service
// =============================================================================

#[derive(Debug, Clone)]
pub struct ShopService {
    pool: SqlitePool,
    locks: ShopLocks,
}

impl ShopService {
    pub fn new(pool: SqlitePool, locks: ShopLocks) -> Self {
        ShopService { pool, locks }
    }

    /// Committed state of one shop. A shop that was never written is empty
    /// with the default header.
    pub async fn snapshot(&self, shop_id: &str) -> ServiceResult<ShopContext> {
        let mut tx = self.pool.begin().await.map_err(transaction_failed)?;
        let context = load_context(&mut tx, shop_id).await?;
        tx.rollback().await.map_err(transaction_failed)?;
        Ok(context)
    }

    pub async fn list_shops(&self) -> ServiceResult<Vec<String>> {
        Ok(CollectionStore::new(self.pool.clone()).list_shops().await?)
    }

    pub async fn add_sku(&self, shop_id: &str, input: NewBatterySku) -> ServiceResult<BatterySku> {
        let sku = self.mutate(shop_id, |shop| shop.add_sku(input)).await?;
        info!(shop_id = %shop_id, sku = %sku.id, label = %sku.label(), "SKU added");
        Ok(sku)
    }

    pub async fn update_sku(
        &self,
        shop_id: &str,
        id: &str,
        patch: SkuPatch,
    ) -> ServiceResult<BatterySku> {
        let sku = self.mutate(shop_id, |shop| shop.update_sku(id, patch)).await?;
        info!(shop_id = %shop_id, sku = %sku.id, stock = sku.stock_quantity, "SKU updated");
        Ok(sku)
    }

    /// Past sales keep referring to the removed id.
    pub async fn remove_sku(&self, shop_id: &str, id: &str) -> ServiceResult<BatterySku> {
        let sku = self.mutate(shop_id, |shop| shop.remove_sku(id)).await?;
        info!(shop_id = %shop_id, sku = %sku.id, "SKU removed");
        Ok(sku)
    }

    pub async fn record_sale(&self, shop_id: &str, request: SaleRequest) -> ServiceResult<SaleRecord> {
        self.record_sale_with(shop_id, |_| Ok(request)).await
    }

    /// Records a sale whose request is built from the locked shop state, so
    /// defaults such as the list price cannot go stale between read and write.
    pub async fn record_sale_with<F>(&self, shop_id: &str, build: F) -> ServiceResult<SaleRecord>
    where
        F: FnOnce(&ShopContext) -> CoreResult<SaleRequest>,
    {
        let sale = self
            .mutate(shop_id, |shop| {
                let request = build(&*shop)?;
                shop.record_sale(request)
            })
            .await?;
        info!(
            shop_id = %shop_id,
            sale = %sale.id,
            sku = %sale.battery_id,
            quantity = sale.quantity_sold,
            total = %sale.total_amount,
            "Sale recorded"
        );
        Ok(sale)
    }

    pub async fn set_shop_config(&self, shop_id: &str, config: ShopConfig) -> ServiceResult<ShopConfig> {
        let config = self.mutate(shop_id, |shop| shop.set_config(config)).await?;
        info!(shop_id = %shop_id, shop_name = %config.shop_name, "Shop header updated");
        Ok(config)
    }

    /// Runs `op` against the freshly loaded shop under the shop lock and one
    /// transaction. Only collections the operation changed are written.
    async fn mutate<T, F>(&self, shop_id: &str, op: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut ShopContext) -> CoreResult<T>,
    {
        let _guard = self.locks.acquire(shop_id).await;

        let mut tx = self.pool.begin().await.map_err(transaction_failed)?;
        claim_write_lock(&mut tx, shop_id).await?;

        let mut context = load_context(&mut tx, shop_id).await?;
        let ledger_before = context.ledger.clone();
        let sales_before = context.sales.len();
        let config_before = context.config.clone();

        let value = match op(&mut context) {
            Ok(value) => value,
            Err(err) => {
                // dropping `tx` rolls back
                debug!(shop_id = %shop_id, error = %err, "Operation rejected");
                return Err(err.into());
            }
        };

        if context.ledger != ledger_before {
            save_in(&mut tx, shop_id, Collection::Inventory, &to_values(context.ledger.list_skus())?)
                .await?;
        }
        if context.sales.len() != sales_before {
            save_in(&mut tx, shop_id, Collection::Sales, &to_values(context.sales.records())?).await?;
        }
        if context.config != config_before {
            save_in(
                &mut tx,
                shop_id,
                Collection::ShopConfig,
                &to_values(std::slice::from_ref(&context.config))?,
            )
            .await?;
        }

        tx.commit().await.map_err(transaction_failed)?;
        debug!(shop_id = %shop_id, "Transaction committed");
        Ok(value)
    }
}

async fn load_context(conn: &mut SqliteConnection, shop_id: &str) -> ServiceResult<ShopContext> {
    let config = load_in(conn, shop_id, Collection::ShopConfig).await?;
    let inventory = load_in(conn, shop_id, Collection::Inventory).await?;
    let sales = load_in(conn, shop_id, Collection::Sales).await?;
    Ok(ShopContext::from_records(shop_id, config, inventory, sales)?)
}

/// A deferred transaction only takes the write lock at its first write. If
/// it read first, another connection could commit in between and our write
/// would fail, so write before reading.
async fn claim_write_lock(conn: &mut SqliteConnection, shop_id: &str) -> DbResult<()> {
    sqlx::query("UPDATE shop_collections SET updated_at = updated_at WHERE shop_id = ?1")
        .bind(shop_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

fn to_values<T: Serialize>(items: &[T]) -> DbResult<Vec<Value>> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(DbError::from))
        .collect()
}

fn transaction_failed(err: sqlx::Error) -> DbError {
    DbError::TransactionFailed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::pool::{Database, DbConfig};
    use murick_core::{CoreError, Money, ValidationError};
    use serde_json::json;

    async fn service() -> (Database, ShopService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shops = db.shops();
        (db, shops)
    }

    fn battery(stock: i64) -> NewBatterySku {
        NewBatterySku::new(
            "AGS",
            "55Ah",
            "N50",
            Money::from_rupees(8_000),
            Money::from_rupees(10_000),
            stock,
        )
    }

    #[tokio::test]
    async fn test_sale_is_persisted() {
        let (_db, shops) = service().await;
        let sku = shops.add_sku("main", battery(10)).await.unwrap();

        let sale = shops
            .record_sale("main", SaleRequest::new(&sku.id, 3, Money::from_rupees(10_000), "owner"))
            .await
            .unwrap();

        let shop = shops.snapshot("main").await.unwrap();
        assert_eq!(shop.ledger.get(&sku.id).unwrap().stock_quantity, 7);
        assert_eq!(shop.sales.records(), &[sale]);
    }

    #[tokio::test]
    async fn test_rejected_sale_writes_nothing() {
        let (_db, shops) = service().await;
        let sku = shops.add_sku("main", battery(2)).await.unwrap();
        let before = shops.snapshot("main").await.unwrap();

        let err = shops
            .record_sale("main", SaleRequest::new(&sku.id, 3, Money::from_rupees(10_000), "owner"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Domain(CoreError::InsufficientStock { available: 2, requested: 3, .. })
        ));
        assert!(!err.is_retryable());
        assert_eq!(shops.snapshot("main").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_record_sale_with_reads_current_price() {
        let (_db, shops) = service().await;
        let sku = shops.add_sku("main", battery(5)).await.unwrap();
        let stale = shops.snapshot("main").await.unwrap();

        let patch = SkuPatch {
            selling_price: Some(Money::from_rupees(12_000)),
            ..Default::default()
        };
        shops.update_sku("main", &sku.id, patch).await.unwrap();
        assert_eq!(
            stale.ledger.get(&sku.id).unwrap().selling_price,
            Money::from_rupees(10_000)
        );

        let id = sku.id.clone();
        let sale = shops
            .record_sale_with("main", move |shop| {
                let price = shop
                    .ledger
                    .get(&id)
                    .map(|sku| sku.selling_price)
                    .ok_or_else(|| CoreError::SkuNotFound(id.clone()))?;
                Ok(SaleRequest::new(&id, 2, price, "owner"))
            })
            .await
            .unwrap();
        assert_eq!(sale.unit_price, Money::from_rupees(12_000));
        assert_eq!(sale.total_amount, Money::from_rupees(24_000));

        let err = shops
            .record_sale_with("main", |_| Err(CoreError::SkuNotFound("gone".to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::SkuNotFound(_))));
        assert_eq!(shops.snapshot("main").await.unwrap().sales.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_first_write_leaves_no_shop() {
        let (_db, shops) = service().await;
        let mut input = battery(1);
        input.brand = "  ".to_string();

        let err = shops.add_sku("fresh", input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::Validation(_))));
        assert!(shops.list_shops().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let (_db, shops) = service().await;
        let sku = shops.add_sku("main", battery(4)).await.unwrap();

        let patch = SkuPatch {
            selling_price: Some(Money::from_rupees(11_000)),
            supplier: Some(Some("Karachi Traders".to_string())),
            ..Default::default()
        };
        let updated = shops.update_sku("main", &sku.id, patch).await.unwrap();
        assert_eq!(updated.selling_price, Money::from_rupees(11_000));

        shops.remove_sku("main", &sku.id).await.unwrap();
        let err = shops.remove_sku("main", &sku.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::SkuNotFound(_))));
        assert!(shops.snapshot("main").await.unwrap().ledger.is_empty());
    }

    #[tokio::test]
    async fn test_shop_config_round_trip() {
        let (_db, shops) = service().await;
        assert_eq!(shops.snapshot("main").await.unwrap().config, ShopConfig::default());

        let config = ShopConfig {
            shop_name: " Murick Batteries ".to_string(),
            proprietor_name: "Imran".to_string(),
            contact_number: "061-1234567".to_string(),
            address: "Main Road, Multan".to_string(),
            email: Some("".to_string()),
        };
        let saved = shops.set_shop_config("main", config).await.unwrap();
        assert_eq!(saved.shop_name, "Murick Batteries");
        assert_eq!(saved.email, None);
        assert_eq!(shops.snapshot("main").await.unwrap().config, saved);
    }

    #[tokio::test]
    async fn test_malformed_store_is_a_domain_error() {
        let (db, shops) = service().await;
        db.collections()
            .save("main", Collection::Inventory, &[json!({"id": "x", "brand": 7})])
            .await
            .unwrap();

        let err = shops.snapshot("main").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(CoreError::Validation(ValidationError::MalformedRecord { .. }))
        ));
    }

    #[tokio::test]
    async fn test_invalid_shop_id() {
        let (_db, shops) = service().await;
        let err = shops.snapshot("no spaces allowed").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_locks_are_per_shop() {
        let locks = ShopLocks::default();
        let _main = locks.acquire("main").await;
        // a different shop is not blocked by "main"
        let _other = locks.acquire("branch").await;
    }
}

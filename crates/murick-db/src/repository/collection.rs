//! # Collection Store
//!
//! Each shop keeps three JSON-array collections, one row apiece in
//! `shop_collections`. Loading a collection that was never saved yields an
//! empty array; saving replaces the whole array.
//!
//! The free functions [`load_in`] and [`save_in`] work on any open
//! connection, which lets [`ShopService`](super::shop::ShopService) run them
//! inside its transaction.

use chrono::Utc;
use serde_json::Value;
use sqlx::{SqliteConnection, SqlitePool};
use std::fmt;
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Inventory,
    Sales,
    ShopConfig,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Inventory, Collection::Sales, Collection::ShopConfig];

    /// Value stored in the `collection` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Inventory => "inventory",
            Collection::Sales => "sales",
            Collection::ShopConfig => "shop_config",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads one collection on an open connection or transaction.
pub async fn load_in(
    conn: &mut SqliteConnection,
    shop_id: &str,
    collection: Collection,
) -> DbResult<Vec<Value>> {
    let payload: Option<String> = sqlx::query_scalar(
        r#"
        SELECT payload
        FROM shop_collections
        WHERE shop_id = ?1 AND collection = ?2
        "#,
    )
    .bind(shop_id)
    .bind(collection.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    let values = match payload {
        Some(payload) => serde_json::from_str::<Vec<Value>>(&payload)?,
        None => Vec::new(),
    };

    debug!(shop_id = %shop_id, collection = %collection, records = values.len(), "Loaded collection");
    Ok(values)
}

/// Replaces one collection on an open connection or transaction.
pub async fn save_in(
    conn: &mut SqliteConnection,
    shop_id: &str,
    collection: Collection,
    values: &[Value],
) -> DbResult<()> {
    let payload = serde_json::to_string(values)?;

    sqlx::query(
        r#"
        INSERT INTO shop_collections (shop_id, collection, payload, updated_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT (shop_id, collection) DO UPDATE SET
            payload = excluded.payload,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(shop_id)
    .bind(collection.as_str())
    .bind(payload)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await?;

    debug!(shop_id = %shop_id, collection = %collection, records = values.len(), "Saved collection");
    Ok(())
}

/// Unlocked access to the stored collections.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    pool: SqlitePool,
}

impl CollectionStore {
    pub fn new(pool: SqlitePool) -> Self {
        CollectionStore { pool }
    }

    pub async fn load(&self, shop_id: &str, collection: Collection) -> DbResult<Vec<Value>> {
        let mut conn = self.pool.acquire().await?;
        load_in(&mut conn, shop_id, collection).await
    }

    pub async fn save(&self, shop_id: &str, collection: Collection, values: &[Value]) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        save_in(&mut conn, shop_id, collection, values).await
    }

    /// Ids of every shop that has saved at least one collection, sorted.
    pub async fn list_shops(&self) -> DbResult<Vec<String>> {
        let shops: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT shop_id FROM shop_collections ORDER BY shop_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(shops)
    }
}

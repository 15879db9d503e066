//! # murick-db: Storage for the Murick Battery Shop
//!
//! SQLite storage via sqlx. Each shop's inventory, sales and header are kept
//! as JSON collections; all business rules live in `murick-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Murick Data Flow                                 │
//! │                                                                         │
//! │  murick sale record --sku ... --qty 2                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     murick-db (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │    │    │
//! │  │   │ SqlitePool    │◄───│ ShopService   │    │ 001_initial  │    │    │
//! │  │   │ ShopLocks     │    │ CollectionSt. │    │   _schema    │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (murick.db in the platform data dir)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use murick_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("murick.db")).await?;
//! let sku = db.shops().add_sku("main", input).await?;
//! let shop = db.shops().snapshot("main").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use pool::{Database, DbConfig, DbLocation};

pub use repository::collection::{Collection, CollectionStore};
pub use repository::shop::{ShopLocks, ShopService};

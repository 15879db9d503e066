//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI command                                                            │
//! │       │  db.shops().record_sale("main", request)                        │
//! │       ▼                                                                 │
//! │  ShopService      per-shop lock, one transaction per operation          │
//! │       │  load_in / save_in                                              │
//! │       ▼                                                                 │
//! │  CollectionStore  JSON arrays in shop_collections                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`CollectionStore`](collection::CollectionStore) - Raw load/save of a collection
//! - [`ShopService`](shop::ShopService) - Validated, serialized shop operations

pub mod collection;
pub mod shop;

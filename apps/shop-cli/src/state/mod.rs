//! # State Module
//!
//! What a command needs besides its own arguments: the loaded configuration,
//! the database handle, and which shop and operator it acts for.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState                                                               │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐     │
//! │  │    config        │ │    db            │ │    shop_id           │     │
//! │  │                  │ │                  │ │                      │     │
//! │  │  AppConfig       │ │  Database        │ │  --shop, else        │     │
//! │  │  (file + env)    │ │  (SQLite pool +  │ │  config.shop.id      │     │
//! │  │                  │ │   shop locks)    │ │                      │     │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::{AppConfig, ConfigError, ConfigResult, CONFIG_FILE_NAME};
pub use db::open_database;

use murick_db::{Database, ShopService};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub shop_id: String,
}

impl AppState {
    /// `shop_override` comes from `--shop` and wins over the config file.
    pub fn new(config: AppConfig, db: Database, shop_override: Option<String>) -> Self {
        let shop_id = shop_override.unwrap_or_else(|| config.shop.id.clone());
        AppState { config, db, shop_id }
    }

    pub fn shops(&self) -> ShopService {
        self.db.shops()
    }

    pub fn operator(&self) -> &str {
        &self.config.shop.operator
    }
}

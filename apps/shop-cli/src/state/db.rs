//! # Database State
//!
//! Opens the shop database described by [`AppConfig`].

use murick_db::{Database, DbConfig};
use tracing::info;

use super::config::AppConfig;
use crate::error::CliResult;

/// Connects to the configured database and applies pending migrations.
pub async fn open_database(config: &AppConfig) -> CliResult<Database> {
    let path = config.database_path()?;
    info!(?path, "Database path determined");

    let db_config = DbConfig::new(path).max_connections(config.database.max_connections);
    let db = Database::new(db_config).await?;

    info!("Database connected and migrations applied");
    Ok(db)
}

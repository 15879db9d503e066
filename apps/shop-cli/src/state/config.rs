//! # CLI Configuration
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`MURICK_*`)
//! 2. Config file (`murick.toml` in the platform config dir, or `--config`)
//! 3. Defaults (this file)
//!
//! ## Example Config File
//! ```toml
//! [database]
//! path = "/var/lib/murick/murick.db"
//! max_connections = 5
//!
//! [shop]
//! id = "main"
//! operator = "imran"
//!
//! [receipt]
//! paper_width = 42
//! ```

use directories::ProjectDirs;
use murick_core::receipt::{MAX_PAPER_WIDTH, MIN_PAPER_WIDTH};
use murick_core::validation::validate_shop_id;
use murick_core::DEFAULT_SHOP_ID;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "murick.toml";
pub const DATABASE_FILE_NAME: &str = "murick.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file not found: {0}")]
    Missing(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. `None` means `murick.db` in the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSettings {
    /// Shop operated on when `--shop` is not given.
    #[serde(default = "default_shop_id")]
    pub id: String,

    /// Recorded as `sold_by` on sales.
    #[serde(default = "default_operator")]
    pub operator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSettings {
    /// Characters per printed line.
    #[serde(default = "default_paper_width")]
    pub paper_width: usize,
}

fn default_max_connections() -> u32 {
    5
}
fn default_shop_id() -> String {
    DEFAULT_SHOP_ID.to_string()
}
fn default_operator() -> String {
    "owner".to_string()
}
fn default_paper_width() -> usize {
    42
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            id: default_shop_id(),
            operator: default_operator(),
        }
    }
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            paper_width: default_paper_width(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub shop: ShopSettings,

    #[serde(default)]
    pub receipt: ReceiptSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` must exist; the default location may be
    /// absent.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::Missing(path)),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Applies `MURICK_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("MURICK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(id) = lookup("MURICK_SHOP_ID") {
            self.shop.id = id;
        }

        if let Some(operator) = lookup("MURICK_OPERATOR") {
            self.shop.operator = operator;
        }

        if let Some(width) = lookup("MURICK_PAPER_WIDTH") {
            match width.parse::<usize>() {
                Ok(w) => self.receipt.paper_width = w,
                Err(_) => warn!(value = %width, "Ignoring invalid MURICK_PAPER_WIDTH"),
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_shop_id(&self.shop.id)
            .map_err(|e| ConfigError::Invalid(format!("shop.id: {}", e)))?;

        if self.shop.operator.trim().is_empty() {
            return Err(ConfigError::Invalid("shop.operator must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        let width = self.receipt.paper_width;
        if !(MIN_PAPER_WIDTH..=MAX_PAPER_WIDTH).contains(&width) {
            return Err(ConfigError::Invalid(format!(
                "receipt.paper_width must be between {} and {}, got {}",
                MIN_PAPER_WIDTH, MAX_PAPER_WIDTH, width
            )));
        }

        Ok(())
    }

    /// Configured database file, or `murick.db` in the platform data dir
    /// (created if missing).
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ConfigError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "murick", "batteries")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shop.id, "main");
        assert_eq!(config.receipt.paper_width, 42);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [shop]
            operator = "imran"
            "#,
        )
        .unwrap();

        assert_eq!(config.shop.operator, "imran");
        assert_eq!(config.shop.id, "main");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.path, None);
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("MURICK_DB_PATH", "/tmp/shop.db"),
            ("MURICK_SHOP_ID", "branch-2"),
            ("MURICK_PAPER_WIDTH", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::from_toml("[receipt]\npaper_width = 48\n").unwrap();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.shop.id, "branch-2");
        // invalid value ignored, file value kept
        assert_eq!(config.receipt.paper_width, 48);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/shop.db"));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.receipt.paper_width = 20;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.shop.id = "two words".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.shop.operator = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(AppConfig::load(Some(path)), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[database]\nmax_connections = 2\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.database.max_connections, 2);

        std::fs::write(&path, "[database\n").unwrap();
        assert!(matches!(AppConfig::from_file(&path), Err(ConfigError::Parse { .. })));
    }
}

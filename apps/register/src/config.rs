//! # Register Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     COMANDA_DB_PATH=/srv/comanda/comanda.db                             │
//! │     COMANDA_LOG=debug                                                   │
//! │     COMANDA_MAX_CONNECTIONS=4                                           │
//! │     COMANDA_TIME_FORMAT="%d/%m/%Y %H:%M"                                │
//! │                                                                         │
//! │  2. TOML Config File (--config, or the platform config dir)             │
//! │     ~/.config/comanda/register.toml (Linux)                             │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! database_path = "/srv/comanda/comanda.db"
//! max_connections = 5
//!
//! [logging]
//! filter = "info,comanda=debug,sqlx=warn"
//!
//! [orders]
//! time_format = "%d/%m/%y, %H:%M"
//! ```

use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{RegisterError, RegisterResult};

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "info,comanda=debug,sqlx=warn";

/// Ticket completion time, e.g. "17/10/26, 21:45".
pub const DEFAULT_TIME_FORMAT: &str = "%d/%m/%y, %H:%M";

const CONFIG_FILE: &str = "register.toml";
const DATABASE_FILE: &str = "comanda.db";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file. Defaults to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Keep everything in memory (nothing survives a restart).
    #[serde(default)]
    pub in_memory: bool,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            max_connections: default_max_connections(),
            in_memory: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directives. `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSettings {
    /// chrono format for the `completedAt` stamp.
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

impl Default for OrderSettings {
    fn default() -> Self {
        OrderSettings {
            time_format: default_time_format(),
        }
    }
}

// =============================================================================
// Register Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub orders: OrderSettings,
}

impl RegisterConfig {
    /// Loads configuration.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RegisterResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or falls back to defaults when loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load register config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> RegisterResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> RegisterResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| RegisterError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;

        info!(?path, "Register config saved");
        Ok(path)
    }

    pub fn validate(&self) -> RegisterResult<()> {
        if self.storage.max_connections == 0 {
            return Err(RegisterError::Config(
                "storage.max_connections must be greater than 0".into(),
            ));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(RegisterError::Config("logging.filter must not be empty".into()));
        }

        let format = self.orders.time_format.trim();
        if format.is_empty() {
            return Err(RegisterError::Config("orders.time_format must not be empty".into()));
        }
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(RegisterError::Config(format!(
                "orders.time_format is not a valid time format: '{}'",
                format
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("COMANDA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Ok(filter) = std::env::var("COMANDA_LOG") {
            self.logging.filter = filter;
        }

        if let Ok(max) = std::env::var("COMANDA_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.storage.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid COMANDA_MAX_CONNECTIONS"),
            }
        }

        if let Ok(format) = std::env::var("COMANDA_TIME_FORMAT") {
            self.orders.time_format = format;
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "comanda", "register")
    }

    /// Platform config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// The database file to open: the configured path, else the platform
    /// data directory (created if needed).
    pub fn database_path(&self) -> RegisterResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs()
            .ok_or_else(|| RegisterError::Config("Could not determine app data directory".into()))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegisterConfig::default();
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.orders.time_format, DEFAULT_TIME_FORMAT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RegisterConfig = toml::from_str(
            r#"
            [storage]
            database_path = "/tmp/comanda.db"

            [orders]
            time_format = "%H:%M"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.storage.database_path.as_deref(),
            Some(Path::new("/tmp/comanda.db"))
        );
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.orders.time_format, "%H:%M");
    }

    #[test]
    fn test_validation() {
        let mut config = RegisterConfig::default();
        config.storage.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = RegisterConfig::default();
        config.orders.time_format = "%d/%m/%Q".to_string();
        assert!(config.validate().is_err());

        let mut config = RegisterConfig::default();
        config.logging.filter = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configured_database_path() {
        let mut config = RegisterConfig::default();
        config.storage.database_path = Some(PathBuf::from("/srv/comanda.db"));
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/srv/comanda.db"));
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&RegisterConfig::default()).unwrap();
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("[orders]"));
    }
}

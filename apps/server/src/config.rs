//! # Server Configuration
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`URIAGE_*`)
//! 2. Config file (`uriage.toml`, or the file named by `URIAGE_CONFIG`)
//! 3. Defaults (this file)
//!
//! ## Example `uriage.toml`
//! ```toml
//! bind_addr = "0.0.0.0:8080"
//! db_path = "/var/lib/uriage/uriage.db"
//! notify_on_save = true
//! default_tax_rate = 10
//!
//! [notify]
//! endpoint = "https://api.line.me/v2/bot/message/broadcast"
//! timeout_secs = 10
//! ```
//!
//! The access token is normally left out of the file and supplied through
//! `URIAGE_LINE_TOKEN`.

use directories::ProjectDirs;
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use uriage_core::TaxRate;
use uriage_notify::{NotifyConfig, NotifyError};

const CONFIG_FILE_NAME: &str = "uriage.toml";
const DB_FILE_NAME: &str = "uriage.db";
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for the HTTP API
    pub bind_addr: SocketAddr,

    /// SQLite database file. Platform data directory when unset.
    pub db_path: Option<PathBuf>,

    /// Settings file holding company info and the product catalog.
    /// Platform data directory when unset.
    pub settings_path: Option<PathBuf>,

    /// Send the save notification after every stored record
    pub notify_on_save: bool,

    /// Tax rate for entries that don't name one
    pub default_tax_rate: TaxRate,

    /// Broadcast endpoint and credential
    pub notify: NotifyConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            db_path: None,
            settings_path: None,
            notify_on_save: true,
            default_tax_rate: TaxRate::Standard,
            notify: NotifyConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads defaults, then the config file if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_file_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.notify.apply_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Overrides server fields from `lookup`, which maps a variable name to
    /// its value. The notification variables are handled by
    /// [`NotifyConfig::apply_env`].
    ///
    /// | Variable                  | Field              |
    /// |---------------------------|--------------------|
    /// | `URIAGE_BIND_ADDR`        | `bind_addr`        |
    /// | `URIAGE_DB_PATH`          | `db_path`          |
    /// | `URIAGE_SETTINGS_PATH`    | `settings_path`    |
    /// | `URIAGE_NOTIFY_ON_SAVE`   | `notify_on_save`   |
    /// | `URIAGE_DEFAULT_TAX_RATE` | `default_tax_rate` |
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("URIAGE_BIND_ADDR") {
            self.bind_addr = addr
                .parse()
                .map_err(|_| ConfigError::InvalidValue("URIAGE_BIND_ADDR".to_string()))?;
        }

        if let Some(path) = lookup("URIAGE_DB_PATH") {
            self.db_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("URIAGE_SETTINGS_PATH") {
            self.settings_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("URIAGE_NOTIFY_ON_SAVE") {
            self.notify_on_save = parse_flag(&flag)
                .ok_or_else(|| ConfigError::InvalidValue("URIAGE_NOTIFY_ON_SAVE".to_string()))?;
        }

        if let Some(rate) = lookup("URIAGE_DEFAULT_TAX_RATE") {
            self.default_tax_rate = rate
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(|percent| TaxRate::from_percent(percent).ok())
                .ok_or_else(|| ConfigError::InvalidValue("URIAGE_DEFAULT_TAX_RATE".to_string()))?;
        }

        Ok(())
    }

    /// Checks values that parse fine but can't work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notify.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingRequired("notify.endpoint".to_string()));
        }
        if self.notify.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("notify.timeout_secs".to_string()));
        }
        Ok(())
    }

    /// Database file, defaulting to the platform data directory.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/jp.uriage.uriage/uriage.db`
    /// - **Windows**: `%APPDATA%\uriage\uriage\data\uriage.db`
    /// - **Linux**: `~/.local/share/uriage/uriage.db`
    pub fn resolved_db_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DB_FILE_NAME)),
        }
    }

    /// Settings file, next to the database by default.
    pub fn resolved_settings_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.settings_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(SETTINGS_FILE_NAME)),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("jp", "uriage", "uriage")
}

/// `URIAGE_CONFIG` if set, otherwise `uriage.toml` in the platform config dir.
fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("URIAGE_CONFIG") {
        return Some(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn data_dir() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDir)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.notify_on_save);
        assert_eq!(config.default_tax_rate, TaxRate::Standard);
        assert!(config.notify.token().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:9000"
            default_tax_rate = 8

            [notify]
            timeout_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.default_tax_rate, TaxRate::Reduced);
        assert_eq!(config.notify.timeout_secs, 3);
        assert_eq!(config.notify.endpoint, uriage_notify::config::DEFAULT_ENDPOINT);
        assert!(config.notify_on_save);
    }

    #[test]
    fn test_toml_rejects_unknown_tax_rate() {
        assert!(matches!(
            ServerConfig::from_toml_str("default_tax_rate = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("URIAGE_BIND_ADDR", "127.0.0.1:3000"),
                ("URIAGE_DB_PATH", "/tmp/u.db"),
                ("URIAGE_NOTIFY_ON_SAVE", "off"),
                ("URIAGE_DEFAULT_TAX_RATE", "8"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.resolved_db_path().unwrap(), PathBuf::from("/tmp/u.db"));
        assert!(!config.notify_on_save);
        assert_eq!(config.default_tax_rate, TaxRate::Reduced);
    }

    #[test]
    fn test_invalid_overrides_name_the_variable() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[("URIAGE_DEFAULT_TAX_RATE", "5")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for URIAGE_DEFAULT_TAX_RATE");

        let err = config
            .apply_overrides(lookup_from(&[("URIAGE_NOTIFY_ON_SAVE", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("URIAGE_NOTIFY_ON_SAVE"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = ServerConfig::default();
        config.notify.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}

//! Application settings loaded from config.toml
//!
//! Every section is optional. A missing file, or a file that leaves a section out,
//! falls back to the built-in defaults: listen on `0.0.0.0:3000`, book envelope
//! transfers under "Ahorro", and seed the standard starter categories.

use crate::{
    core::{
        category::{CategorySeed, default_category_seeds},
        envelope::TransferPolicy,
    },
    errors::{Error, Result},
};
use chrono::Duration;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Config file used when `CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// How envelope deposits and withdrawals are booked
    pub transfers: TransferPolicy,
    /// Categories created for every new user
    pub default_categories: Vec<CategorySeed>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            transfers: TransferPolicy::default(),
            default_categories: default_category_seeds(),
        }
    }
}

/// Sessions older than this are dropped unless configured otherwise.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_address: String,
    /// Lifetime of a login session, in hours
    pub session_ttl_hours: i64,
}

impl ServerConfig {
    /// Session lifetime as a duration.
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }
}

impl AppConfig {
    /// Rejects values that parse but cannot work at runtime.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("transfers.deposit_category", &self.transfers.deposit_category),
            ("transfers.withdraw_category", &self.transfers.withdraw_category),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config {
                    message: format!("{key} cannot be blank"),
                });
            }
        }
        if !(1..=24 * 365).contains(&self.server.session_ttl_hours) {
            return Err(Error::Config {
                message: format!(
                    "server.session_ttl_hours must be between 1 and 8760, got {}",
                    self.server.session_ttl_hours
                ),
            });
        }
        Ok(())
    }
}

/// Parses and validates configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
/// - A value fails [`AppConfig::validate`]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.as_ref().display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `CONFIG_PATH` (default ./config.toml).
///
/// A missing file is not an error and yields [`AppConfig::default`].
pub fn load_app_config() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        debug!(%path, "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    let config = load_config(&path)?;
    info!(%path, "configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::TxKind;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            default_categories = [
                { nombre = "Mercado", tipo = "gasto" },
                { nombre = "Sueldo", tipo = "ingreso" },
            ]

            [server]
            bind_address = "127.0.0.1:8080"
            session_ttl_hours = 12

            [transfers]
            deposit_category = "Ahorro"
            withdraw_category = "Retiro Ahorro"
            require_available_balance = true
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.server.session_ttl(), Duration::hours(12));
        assert_eq!(config.transfers.withdraw_category, "Retiro Ahorro");
        assert!(config.transfers.require_available_balance);
        assert_eq!(config.default_categories.len(), 2);
        assert_eq!(config.default_categories[1].tipo, TxKind::Ingreso);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_config("[transfers]\nrequire_available_balance = true\n").unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.transfers.deposit_category, "Ahorro");
        assert_eq!(config.transfers.withdraw_category, "Ahorro");
        assert_eq!(config.default_categories, default_category_seeds());

        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let result = parse_config("[server]\nbind_address = 3000\n");
        assert!(matches!(result, Err(Error::Config { message: _ })));

        let result = parse_config("default_categories = [{ nombre = \"X\", tipo = \"otro\" }]");
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_transfer_categories_are_rejected() {
        let result = parse_config("[transfers]\ndeposit_category = \"\"\n");
        assert!(matches!(result, Err(Error::Config { message }) if message.contains("deposit_category")));

        let result = parse_config("[transfers]\nwithdraw_category = \"   \"\n");
        assert!(matches!(result, Err(Error::Config { message }) if message.contains("withdraw_category")));
    }

    #[test]
    fn test_session_ttl_must_be_positive() {
        let result = parse_config("[server]\nsession_ttl_hours = 0\n");
        assert!(matches!(result, Err(Error::Config { message: _ })));

        assert_eq!(
            AppConfig::default().server.session_ttl(),
            Duration::hours(DEFAULT_SESSION_TTL_HOURS)
        );
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = load_config("/nonexistent/config.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}

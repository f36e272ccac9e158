//! Console configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

use tome_core::LogoutPolicy;

const DB_PATH: &str = "TOME_DB_PATH";
const PERSIST_AUDIT_LOG: &str = "TOME_PERSIST_AUDIT_LOG";
const RETAIN_SELECTION: &str = "TOME_RETAIN_SELECTION_ON_NESTED_LOGOUT";

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// SQLite file holding the records
    pub db_path: PathBuf,

    /// Write the audit log back at shutdown and reload it at startup
    pub persist_audit_log: bool,

    /// Keep a selection while the same identity is still logged in further
    /// down the login stack
    pub retain_selection_on_nested_logout: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            db_path: PathBuf::from("./bookstore.db"),
            persist_audit_log: false,
            retain_selection_on_nested_logout: true,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Environment Variables
    /// - `TOME_DB_PATH`: database file (default `./bookstore.db`)
    /// - `TOME_PERSIST_AUDIT_LOG`: `true|false` (default `false`)
    /// - `TOME_RETAIN_SELECTION_ON_NESTED_LOGOUT`: `true|false` (default `true`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ConsoleConfig::default();

        Ok(ConsoleConfig {
            db_path: lookup(DB_PATH)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            persist_audit_log: parse_flag(PERSIST_AUDIT_LOG, lookup(PERSIST_AUDIT_LOG))?
                .unwrap_or(defaults.persist_audit_log),

            retain_selection_on_nested_logout: parse_flag(RETAIN_SELECTION, lookup(RETAIN_SELECTION))?
                .unwrap_or(defaults.retain_selection_on_nested_logout),
        })
    }

    pub fn logout_policy(&self) -> LogoutPolicy {
        if self.retain_selection_on_nested_logout {
            LogoutPolicy::RetainWhileActive
        } else {
            LogoutPolicy::ClearAlways
        }
    }
}

fn parse_flag(key: &str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue(key.to_string())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

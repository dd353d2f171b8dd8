//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `GOMARKETPLACE_STORAGE_DIR` - Directory holding the device storage (default: `.gomarketplace`)
//! - `GOMARKETPLACE_CART_KEY` - Storage key of the persisted cart (default: `GoMarketPlace@Cart`)
//! - `GOMARKETPLACE_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::storage::{FileStore, KeyValueStore};

/// Storage key under which the cart is persisted.
pub const CART_STORAGE_KEY: &str = "GoMarketPlace@Cart";

/// Default device storage directory, relative to the working directory.
pub const DEFAULT_STORAGE_DIR: &str = ".gomarketplace";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory backing the local key-value store
    pub storage_dir: PathBuf,
    /// Key the serialized cart is stored under
    pub storage_key: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: CART_STORAGE_KEY.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_dir = PathBuf::from(get_or_default(
            &lookup,
            "GOMARKETPLACE_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));

        let storage_key = get_or_default(&lookup, "GOMARKETPLACE_CART_KEY", CART_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "GOMARKETPLACE_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let log_format = get_or_default(&lookup, "GOMARKETPLACE_LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("GOMARKETPLACE_LOG_FORMAT".to_string(), e))?;

        Ok(Self {
            storage_dir,
            storage_key,
            log_format,
        })
    }

    /// Build the on-device store described by this configuration.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::new(&self.storage_dir))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

//! # Store Configuration
//!
//! Where the store lives and which key holds the cart.
//!
//! ## Loading Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults                                                            │
//! │     database_path = <platform data dir>/storefront.db                   │
//! │     cart_key      = "cart"                                              │
//! │                                                                         │
//! │  2. Environment overrides                                               │
//! │     STOREFRONT_DB_PATH   → database_path                                │
//! │     STOREFRONT_CART_KEY  → cart_key                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Platform-Specific Paths
//! - **macOS**: `~/Library/Application Support/com.hours-collection.storefront/`
//! - **Windows**: `%APPDATA%\hours-collection\storefront\data\`
//! - **Linux**: `~/.local/share/storefront/`

use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

/// Storage key of the cart unless overridden.
pub const DEFAULT_CART_KEY: &str = "cart";

pub const ENV_DB_PATH: &str = "STOREFRONT_DB_PATH";
pub const ENV_CART_KEY: &str = "STOREFRONT_CART_KEY";

const DB_FILE_NAME: &str = "storefront.db";

/// Runtime configuration of the storage layer.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub cart_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            database_path: Self::default_database_path()
                .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME)),
            cart_key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    /// Applies overrides from `lookup` (an environment-like source).
    ///
    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DB_PATH) {
            if path.trim().is_empty() {
                warn!(var = ENV_DB_PATH, "Ignoring empty database path override");
            } else {
                debug!(path = %path, "Overriding database path from environment");
                self.database_path = PathBuf::from(path);
            }
        }

        if let Some(key) = lookup(ENV_CART_KEY) {
            if key.trim().is_empty() {
                warn!(var = ENV_CART_KEY, "Ignoring empty cart key override");
            } else {
                debug!(cart_key = %key, "Overriding cart key from environment");
                self.cart_key = key;
            }
        }
    }

    /// `<platform data dir>/storefront.db`, if the platform has one.
    pub fn default_database_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "hours-collection", "storefront")
            .map(|dirs| dirs.data_dir().join(DB_FILE_NAME))
    }

    /// Creates the directory holding the database file.
    pub fn ensure_data_dir(&self) -> DbResult<()> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DbError::ConnectionFailed(format!(
                        "cannot create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Pool settings for this store.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.cart_key, "cart");
        assert!(config.database_path.ends_with(DB_FILE_NAME));
    }

    #[test]
    fn test_overrides() {
        let mut config = StoreConfig::default();
        config.apply_overrides(env(&[
            (ENV_DB_PATH, "/tmp/dev/storefront.db"),
            (ENV_CART_KEY, "cart:dev"),
        ]));

        assert_eq!(config.database_path, PathBuf::from("/tmp/dev/storefront.db"));
        assert_eq!(config.cart_key, "cart:dev");
        assert_eq!(
            config.db_config().database_path,
            PathBuf::from("/tmp/dev/storefront.db")
        );
    }

    #[test]
    fn test_empty_overrides_ignored() {
        let mut config = StoreConfig::default();
        config.apply_overrides(env(&[(ENV_DB_PATH, ""), (ENV_CART_KEY, "  ")]));
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_ensure_data_dir() {
        let dir = std::env::temp_dir().join(format!("storefront-config-{}", std::process::id()));
        let config = StoreConfig {
            database_path: dir.join("nested").join(DB_FILE_NAME),
            cart_key: DEFAULT_CART_KEY.to_string(),
        };

        config.ensure_data_dir().unwrap();
        assert!(dir.join("nested").is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}

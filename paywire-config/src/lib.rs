//! Configuration for Paywire services
//!
//! Values are layered into a [`ConfigManager`] from files, `.env` files and
//! `PAYWIRE_*` environment variables (later sources win), then read into the
//! typed, validated [`PaywireSettings`].
//!
//! ```rust,no_run
//! use paywire_config::{ConfigManager, PaywireSettings};
//!
//! # fn main() -> paywire_config::Result<()> {
//! let manager = ConfigManager::with_prefix("PAYWIRE");
//! manager.load_file("/etc/paywire/paywire.toml")?;
//! manager.load_dotenv(None)?;
//!
//! let settings = PaywireSettings::from_manager(&manager)?;
//! println!("retrying up to {} times", settings.webhook.max_retry_attempts);
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{PaywireSettings, WebhookSettings};
pub use validation::{ConfigValidator, Validate};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe store of flat configuration keys
#[derive(Clone, Debug, Default)]
pub struct ConfigManager {
    config: Arc<RwLock<HashMap<String, Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    /// Create an empty manager that reads every environment variable
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager that only reads environment variables starting with `prefix`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config: Arc::default(),
            env_prefix: Some(prefix.into()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Value>> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load configuration from environment variables
    pub fn load_env(&self) -> Result<()> {
        let loader = EnvLoader::new(self.env_prefix.clone());
        let env_vars = loader.load()?;

        let mut config = self.write();
        for (key, value) in env_vars {
            config.insert(key, Value::String(value));
        }

        Ok(())
    }

    /// Load a `.env` file into the process environment, then [`load_env`](Self::load_env).
    ///
    /// Without a path, a missing `.env` in the working directory is not an error.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        self.load_env()
    }

    /// Load configuration from a JSON, TOML or env file, detected by extension
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = ConfigLoader::auto(path)?.load_file(path)?;

        self.write().extend(data);
        Ok(())
    }

    /// Set a configuration value
    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        self.write().insert(key.to_string(), json_value);
        Ok(())
    }

    /// Get a configuration value with its exact JSON type
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value).map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    /// Get a configuration value with default
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Get a scalar, accepting both native values and their string forms.
    ///
    /// Environment variables are always strings, so `"3"` and `3` both read
    /// as `3u32` here.
    pub fn get_parsed<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = match self.read().get(key) {
            None => return Err(ConfigError::KeyNotFound(key.to_string())),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected a scalar, found {}", other),
                });
            }
        };

        raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Like [`get_parsed`](Self::get_parsed), but a missing key yields `default`.
    ///
    /// A present but malformed value is still an error.
    pub fn get_parsed_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_parsed(key) {
            Err(ConfigError::KeyNotFound(_)) => Ok(default),
            other => other,
        }
    }

    /// Get a string value
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_parsed(key)
    }

    /// Check if a key exists
    pub fn has(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Get all configuration keys
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Copy every key from `other`, overwriting existing ones
    pub fn merge(&self, other: &ConfigManager) {
        let other_config = other.read().clone();
        self.write().extend(other_config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let manager = ConfigManager::new();
        manager.set("test_key", "test_value").unwrap();

        let value: String = manager.get("test_key").unwrap();
        assert_eq!(value, "test_value");
    }

    #[test]
    fn test_get_or_default() {
        let manager = ConfigManager::new();

        let value: String = manager.get_or("missing_key", "default_value".to_string());
        assert_eq!(value, "default_value");
    }

    #[test]
    fn test_get_parsed_accepts_strings_and_numbers() {
        let manager = ConfigManager::new();
        manager.set("as_string", " 42 ").unwrap();
        manager.set("as_number", 7).unwrap();

        assert_eq!(manager.get_parsed::<u32>("as_string").unwrap(), 42);
        assert_eq!(manager.get_parsed::<u64>("as_number").unwrap(), 7);
        assert_eq!(manager.get_string("as_number").unwrap(), "7");
    }

    #[test]
    fn test_get_parsed_rejects_garbage() {
        let manager = ConfigManager::new();
        manager.set("attempts", "three").unwrap();
        manager.set("nested", serde_json::json!({"a": 1})).unwrap();

        assert!(matches!(
            manager.get_parsed::<u32>("attempts"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            manager.get_parsed::<u32>("nested"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_get_parsed_or() {
        let manager = ConfigManager::new();
        manager.set("bad", "x").unwrap();

        assert_eq!(manager.get_parsed_or("missing", 5u32).unwrap(), 5);
        assert!(manager.get_parsed_or("bad", 5u32).is_err());
    }

    #[test]
    fn test_has_and_keys() {
        let manager = ConfigManager::new();
        manager.set("existing_key", "value").unwrap();

        assert!(manager.has("existing_key"));
        assert!(!manager.has("missing_key"));
        assert_eq!(manager.keys(), vec!["existing_key".to_string()]);
    }

    #[test]
    fn test_merge_overwrites() {
        let base = ConfigManager::new();
        base.set("a", 1).unwrap();
        base.set("b", 1).unwrap();

        let overlay = ConfigManager::new();
        overlay.set("b", 2).unwrap();

        base.merge(&overlay);
        assert_eq!(base.get::<i64>("a").unwrap(), 1);
        assert_eq!(base.get::<i64>("b").unwrap(), 2);
    }
}

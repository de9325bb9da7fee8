//! Typed settings consumed by the delivery and card-protection components

use crate::{ConfigError, ConfigManager, ConfigValidator, Result, Validate};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use std::time::Duration;

pub const MAX_RETRY_ATTEMPTS: &str = "webhook_retry_max_attempts";
pub const INITIAL_RETRY_DELAY_MS: &str = "webhook_retry_initial_delay_ms";
pub const CONNECT_TIMEOUT_MS: &str = "webhook_timeout_connect_ms";
pub const READ_TIMEOUT_MS: &str = "webhook_timeout_read_ms";
pub const ENCRYPTION_SECRET_KEY: &str = "encryption_secret_key";

/// Outbound webhook delivery settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSettings {
    /// Total attempts per subscriber, including the first
    pub max_retry_attempts: u32,
    /// Delay after the first failure; doubles after each further failure
    pub initial_retry_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            max_retry_attempts: 3,
            initial_retry_delay_ms: 5_000,
            connect_timeout_ms: 5_000,
            read_timeout_ms: 10_000,
        }
    }
}

impl WebhookSettings {
    pub fn initial_retry_delay(&self) -> Duration {
        Duration::from_millis(self.initial_retry_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Everything a Paywire instance needs at startup.
///
/// The encryption secret has no default: a configuration without it cannot
/// be turned into settings, so the process fails before serving anything.
#[derive(Debug)]
pub struct PaywireSettings {
    pub webhook: WebhookSettings,
    pub encryption_secret_key: SecretString,
}

impl PaywireSettings {
    /// Settings with default delivery values and the given secret
    pub fn new(encryption_secret_key: impl Into<String>) -> Self {
        Self {
            webhook: WebhookSettings::default(),
            encryption_secret_key: SecretString::from(encryption_secret_key.into()),
        }
    }

    /// Replace the webhook delivery settings
    pub fn with_webhook(mut self, webhook: WebhookSettings) -> Self {
        self.webhook = webhook;
        self
    }

    /// Read and validate settings from a populated manager
    pub fn from_manager(manager: &ConfigManager) -> Result<Self> {
        let defaults = WebhookSettings::default();

        let webhook = WebhookSettings {
            max_retry_attempts: manager
                .get_parsed_or(MAX_RETRY_ATTEMPTS, defaults.max_retry_attempts)?,
            initial_retry_delay_ms: manager
                .get_parsed_or(INITIAL_RETRY_DELAY_MS, defaults.initial_retry_delay_ms)?,
            connect_timeout_ms: manager
                .get_parsed_or(CONNECT_TIMEOUT_MS, defaults.connect_timeout_ms)?,
            read_timeout_ms: manager.get_parsed_or(READ_TIMEOUT_MS, defaults.read_timeout_ms)?,
        };

        let secret = manager.get_string(ENCRYPTION_SECRET_KEY)?;

        let settings = Self {
            webhook,
            encryption_secret_key: SecretString::from(secret),
        };
        settings.validate()?;

        Ok(settings)
    }

    /// Load `PAYWIRE_*` variables, optionally after reading a config file and
    /// a `.env` file, and build settings from them.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let manager = ConfigManager::with_prefix("PAYWIRE");
        if let Some(path) = config_file {
            manager.load_file(path)?;
        }
        manager.load_dotenv(None)?;

        Self::from_manager(&manager)
    }
}

impl Validate for PaywireSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(
            self.encryption_secret_key.expose_secret(),
            ENCRYPTION_SECRET_KEY,
        )?;
        ConfigValidator::in_range(
            self.webhook.max_retry_attempts,
            1,
            u32::MAX,
            MAX_RETRY_ATTEMPTS,
        )?;

        if self.webhook.connect_timeout_ms == 0 || self.webhook.read_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "webhook timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_secret() -> ConfigManager {
        let manager = ConfigManager::new();
        manager
            .set(ENCRYPTION_SECRET_KEY, "TestSecretKey12345TestSecretKey12")
            .unwrap();
        manager
    }

    #[test]
    fn test_defaults_apply() {
        let settings = PaywireSettings::from_manager(&manager_with_secret()).unwrap();

        assert_eq!(settings.webhook.max_retry_attempts, 3);
        assert_eq!(
            settings.webhook.initial_retry_delay(),
            Duration::from_millis(5000)
        );
        assert_eq!(
            settings.webhook.connect_timeout(),
            Duration::from_millis(5000)
        );
        assert_eq!(settings.webhook.read_timeout(), Duration::from_millis(10000));
    }

    #[test]
    fn test_overrides_from_strings() {
        let manager = manager_with_secret();
        manager.set(MAX_RETRY_ATTEMPTS, "5").unwrap();
        manager.set(INITIAL_RETRY_DELAY_MS, "250").unwrap();
        manager.set(READ_TIMEOUT_MS, 1500).unwrap();

        let settings = PaywireSettings::from_manager(&manager).unwrap();
        assert_eq!(settings.webhook.max_retry_attempts, 5);
        assert_eq!(settings.webhook.initial_retry_delay_ms, 250);
        assert_eq!(settings.webhook.read_timeout_ms, 1500);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = PaywireSettings::from_manager(&ConfigManager::new());
        assert!(
            matches!(result, Err(ConfigError::KeyNotFound(key)) if key == ENCRYPTION_SECRET_KEY)
        );
    }

    #[test]
    fn test_blank_secret_is_rejected() {
        let manager = ConfigManager::new();
        manager.set(ENCRYPTION_SECRET_KEY, "  ").unwrap();

        assert!(matches!(
            PaywireSettings::from_manager(&manager),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let manager = manager_with_secret();
        manager.set(MAX_RETRY_ATTEMPTS, 0).unwrap();

        assert!(PaywireSettings::from_manager(&manager).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let settings = PaywireSettings::new("super-secret-value");
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("super-secret-value"));
    }
}

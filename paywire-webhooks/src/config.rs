//! Configuration for webhook delivery

use crate::RetryPolicy;
use std::time::Duration;

/// Configuration for the HTTP transport and retry loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Maximum time to establish a connection
    pub connect_timeout: Duration,

    /// Maximum time to wait for response data
    pub read_timeout: Duration,

    /// User-Agent header for outgoing requests
    pub user_agent: String,

    /// Attempts and backoff per subscriber
    pub retry_policy: RetryPolicy,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            user_agent: format!("Paywire-Webhooks/{}", env!("CARGO_PKG_VERSION")),
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl WebhookConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> WebhookConfigBuilder {
        WebhookConfigBuilder::new()
    }
}

/// Builder for WebhookConfig
#[derive(Debug, Clone, Default)]
pub struct WebhookConfigBuilder {
    config: WebhookConfig,
}

impl WebhookConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: WebhookConfig::default(),
        }
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the retry policy
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry_policy = policy;
        self
    }

    /// Total attempts per subscriber, including the first
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry_policy.max_attempts = attempts;
        self
    }

    /// Delay after the first failed attempt
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.config.retry_policy.initial_delay = delay;
        self
    }

    /// Make a single attempt per subscriber
    pub fn no_retries(mut self) -> Self {
        self.config.retry_policy = RetryPolicy::none();
        self
    }

    /// Build the configuration
    pub fn build(self) -> WebhookConfig {
        self.config
    }
}

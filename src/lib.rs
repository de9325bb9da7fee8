// Paywire - payment intake with encrypted card storage and webhook notifications
//
// This crate wires the member crates together: settings come from
// `paywire-config`, card protection and the payment flow from
// `paywire-payments`, delivery from `paywire-webhooks`.

use paywire_config::{ConfigError, PaywireSettings, WebhookSettings};
use paywire_payments::{
    CardProtector, CreatePaymentRequest, CryptoError, InMemoryPaymentRepository,
    PaymentOnboarding, PaymentRepository, PaymentResult, PaymentView,
};
use paywire_webhooks::{
    DispatchCoordinator, HttpTransport, InMemorySubscriberRepository, RetryPolicy, RetryScheduler,
    ShutdownSignal, SubscriberRepository, SubscriberService, WebhookConfig, WebhookError,
    WebhookTransport,
};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

// Re-export member crates
pub use paywire_config;
pub use paywire_log;
pub use paywire_payments;
pub use paywire_validation;
pub use paywire_webhooks;

/// Errors raised while assembling a [`Paywire`] instance
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Card protection setup failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Webhook setup failed: {0}")]
    Webhook(#[from] WebhookError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Translate delivery settings into the webhook crate's configuration
pub fn webhook_config(settings: &WebhookSettings) -> WebhookConfig {
    WebhookConfig::builder()
        .connect_timeout(settings.connect_timeout())
        .read_timeout(settings.read_timeout())
        .retry_policy(RetryPolicy::exponential(
            settings.max_retry_attempts,
            settings.initial_retry_delay(),
        ))
        .build()
}

/// An assembled payment service.
///
/// Cloning is cheap; clones share stores, the transport and the shutdown
/// signal.
#[derive(Clone)]
pub struct Paywire {
    onboarding: PaymentOnboarding,
    subscribers: SubscriberService,
    protector: Arc<CardProtector>,
    shutdown: ShutdownSignal,
}

impl Paywire {
    /// Install logging, load settings and build an instance with in-memory stores.
    ///
    /// Fails when the encryption secret is missing.
    pub fn bootstrap(config_file: Option<&Path>) -> Result<Self> {
        paywire_log::init();
        let settings = PaywireSettings::load(config_file)?;
        Self::from_settings(&settings)
    }

    /// Build an instance with in-memory stores and the HTTP transport
    pub fn from_settings(settings: &PaywireSettings) -> Result<Self> {
        Self::with_repositories(
            settings,
            Arc::new(InMemoryPaymentRepository::new()),
            Arc::new(InMemorySubscriberRepository::new()),
        )
    }

    /// Build an instance on caller-supplied stores
    pub fn with_repositories(
        settings: &PaywireSettings,
        payments: Arc<dyn PaymentRepository>,
        subscribers: Arc<dyn SubscriberRepository>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(&webhook_config(&settings.webhook))?;
        Self::with_transport(settings, Arc::new(transport), payments, subscribers)
    }

    /// Build an instance with a custom delivery transport
    pub fn with_transport(
        settings: &PaywireSettings,
        transport: Arc<dyn WebhookTransport>,
        payments: Arc<dyn PaymentRepository>,
        subscribers: Arc<dyn SubscriberRepository>,
    ) -> Result<Self> {
        let secret = SecretString::from(settings.encryption_secret_key.expose_secret());
        let protector = Arc::new(CardProtector::new(secret)?);

        let config = webhook_config(&settings.webhook);
        let shutdown = ShutdownSignal::new();
        let scheduler =
            RetryScheduler::new(transport, config.retry_policy).with_shutdown(shutdown.clone());

        let subscribers = SubscriberService::new(subscribers);
        let onboarding = PaymentOnboarding::new(
            protector.clone(),
            payments,
            subscribers.clone(),
            DispatchCoordinator::new(scheduler),
        );

        info!(
            max_attempts = settings.webhook.max_retry_attempts,
            initial_delay_ms = settings.webhook.initial_retry_delay_ms,
            "Paywire initialized"
        );

        Ok(Self {
            onboarding,
            subscribers,
            protector,
            shutdown,
        })
    }

    /// Create a payment; see [`PaymentOnboarding::create_payment`]
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> PaymentResult<PaymentView> {
        self.onboarding.create_payment(request).await
    }

    pub fn onboarding(&self) -> &PaymentOnboarding {
        &self.onboarding
    }

    pub fn subscribers(&self) -> &SubscriberService {
        &self.subscribers
    }

    pub fn card_protector(&self) -> &CardProtector {
        &self.protector
    }

    /// Stop pending retries. Tasks waiting out a backoff end at once; an
    /// attempt already in flight runs to completion. Nothing is persisted.
    pub fn shutdown(&self) {
        info!("Stopping webhook delivery");
        self.shutdown.trigger();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_triggered()
    }
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{Error, Paywire, Result};
    pub use paywire_config::{ConfigManager, PaywireSettings, WebhookSettings};
    pub use paywire_payments::{
        CardProtector, CreatePaymentRequest, NotificationEvent, PaymentError, PaymentRepository,
        PaymentView,
    };
    pub use paywire_validation::{Validate, ValidationErrors};
    pub use paywire_webhooks::{
        CreateSubscriberRequest, DeliveryState, RetryPolicy, Subscriber, SubscriberRepository,
        WebhookError, WebhookTransport,
    };
}

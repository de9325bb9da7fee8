//! Payment intake for Paywire
//!
//! Accepts a payment, encrypts the card number, stores the record and tells
//! every active webhook subscriber about it.
//!
//! ## Overview
//!
//! ```text
//! CreatePaymentRequest
//!        │ validate
//!        ▼
//!  CardProtector ── encrypt + mask ──▶ PaymentRepository::save
//!                                            │
//!                                            ▼
//!                                       PaymentView ──▶ returned to caller
//!                                            │
//!                                            ▼
//!                   NotificationEvent ──▶ DispatchCoordinator (one task per subscriber)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paywire_payments::{
//!     CardProtector, CreatePaymentRequest, InMemoryPaymentRepository, PaymentOnboarding,
//! };
//! use paywire_webhooks::{
//!     DispatchCoordinator, HttpTransport, InMemorySubscriberRepository, RetryScheduler,
//!     SubscriberService, WebhookConfig,
//! };
//! use secrecy::SecretString;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WebhookConfig::default();
//! let transport = Arc::new(HttpTransport::new(&config)?);
//! let scheduler = RetryScheduler::new(transport, config.retry_policy);
//!
//! let onboarding = PaymentOnboarding::new(
//!     Arc::new(CardProtector::new(SecretString::from("change-me"))?),
//!     Arc::new(InMemoryPaymentRepository::new()),
//!     SubscriberService::new(Arc::new(InMemorySubscriberRepository::new())),
//!     DispatchCoordinator::new(scheduler),
//! );
//!
//! let payment = onboarding
//!     .create_payment(CreatePaymentRequest::new("John", "Doe", "12345", "4532015112830366"))
//!     .await?;
//! assert_eq!(payment.card_number_masked, "****0366");
//! # Ok(())
//! # }
//! ```

pub mod card;
pub mod error;
pub mod event;
pub mod onboarding;
pub mod store;
pub mod types;
pub mod validation;

pub use card::{CardProtector, ProtectedCard, mask, mask_card_number};
pub use error::*;
pub use event::{NotificationEvent, PAYMENT_CREATED};
pub use onboarding::PaymentOnboarding;
pub use store::{InMemoryPaymentRepository, PaymentRepository};
pub use types::*;
pub use validation::MAX_NAME_LENGTH;

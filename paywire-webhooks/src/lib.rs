//! Outbound webhook delivery for Paywire
//!
//! Events are serialized once into a [`WebhookPayload`] and fanned out by the
//! [`DispatchCoordinator`]: every active [`Subscriber`] gets its own
//! [`DeliveryTask`], driven by the [`RetryScheduler`] on a separate tokio task.
//!
//! # Features
//!
//! - **Fire-and-forget fan-out**: dispatch returns as soon as tasks are spawned
//! - **Exponential backoff**: `initial_delay * 2^(k-1)` after failed attempt `k`
//! - **Pluggable transport**: [`HttpTransport`] over `reqwest`, or any [`WebhookTransport`]
//! - **Subscriber registry**: validated registration behind [`SubscriberRepository`]
//! - **Graceful stop**: a [`ShutdownSignal`] cuts short any backoff wait
//!
//! # Example
//!
//! ```rust,no_run
//! use paywire_webhooks::{
//!     DispatchCoordinator, HttpTransport, RetryScheduler, Subscriber, WebhookConfig,
//!     WebhookPayload,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WebhookConfig::default();
//!     let transport = Arc::new(HttpTransport::new(&config)?);
//!     let coordinator =
//!         DispatchCoordinator::new(RetryScheduler::new(transport, config.retry_policy));
//!
//!     let payload = WebhookPayload::from_event(
//!         "PAYMENT_CREATED",
//!         &serde_json::json!({ "eventType": "PAYMENT_CREATED" }),
//!     )?;
//!
//!     let subscribers: Vec<Subscriber> = Vec::new();
//!     let launched = coordinator.dispatch(&payload, &subscribers);
//!     println!("notifying {} subscribers", launched);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod dispatcher;
mod error;
mod payload;
mod registry;
mod retry;
mod scheduler;
mod shutdown;
mod subscriber;
pub mod timestamp;

pub use client::{HttpTransport, WebhookTransport};
pub use config::{WebhookConfig, WebhookConfigBuilder};
pub use dispatcher::DispatchCoordinator;
pub use error::{DeliveryError, WebhookError};
pub use payload::{DeliveryState, DeliveryTask, WebhookPayload};
pub use registry::{InMemorySubscriberRepository, SubscriberRepository, SubscriberService};
pub use retry::RetryPolicy;
pub use scheduler::RetryScheduler;
pub use shutdown::{ShutdownListener, ShutdownSignal};
pub use subscriber::{
    CreateSubscriberRequest, MAX_DESCRIPTION_LENGTH, MAX_URL_LENGTH, NewSubscriber, Subscriber,
};

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;

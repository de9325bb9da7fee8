//! Webhook payload and delivery task types

use crate::{DeliveryError, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A serialized event, shared read-only by every delivery of it.
///
/// Cloning is cheap: clones share one body buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookPayload {
    event_type: String,
    body: Bytes,
}

impl WebhookPayload {
    /// Serialize `event` to JSON once
    pub fn from_event<E: Serialize>(event_type: impl Into<String>, event: &E) -> Result<Self> {
        let body = serde_json::to_vec(event)?;
        Ok(Self::from_bytes(event_type, body))
    }

    /// Wrap an already serialized JSON body
    pub fn from_bytes(event_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            event_type: event_type.into(),
            body: body.into(),
        }
    }

    /// Event type label (e.g. `PAYMENT_CREATED`)
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Serialized JSON body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl fmt::Debug for WebhookPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookPayload")
            .field("event_type", &self.event_type)
            .field("bytes", &self.body.len())
            .finish()
    }
}

/// Lifecycle of one delivery task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Created, no attempt made yet
    Pending,

    /// An attempt is in flight or waiting for its backoff
    Attempting,

    /// A 2xx response was received
    Succeeded,

    /// Attempts ran out, or shutdown interrupted the backoff
    Exhausted,
}

impl DeliveryState {
    /// Check if the task is finished (success or exhaustion)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Exhausted)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Delivery of one payload to one subscriber. Lives only in memory.
#[derive(Debug, Clone)]
pub struct DeliveryTask {
    pub id: Uuid,

    /// Target subscriber URL
    pub subscriber_url: String,

    pub payload: WebhookPayload,

    /// Attempts started so far
    pub attempts: u32,

    /// Failure of the most recent unsuccessful attempt
    pub last_error: Option<DeliveryError>,

    pub state: DeliveryState,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl DeliveryTask {
    pub fn new(subscriber_url: impl Into<String>, payload: WebhookPayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            subscriber_url: subscriber_url.into(),
            payload,
            attempts: 0,
            last_error: None,
            state: DeliveryState::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Start the next attempt
    pub fn mark_attempting(&mut self) {
        self.state = DeliveryState::Attempting;
        self.attempts += 1;
        self.updated_at = Utc::now();
    }

    /// Record a successful attempt
    pub fn mark_succeeded(&mut self) {
        self.state = DeliveryState::Succeeded;
        self.last_error = None;
        self.updated_at = Utc::now();
    }

    /// Record a failed attempt; the task stays in `Attempting`
    pub fn record_failure(&mut self, error: DeliveryError) {
        self.last_error = Some(error);
        self.updated_at = Utc::now();
    }

    /// Give up on this subscriber
    pub fn mark_exhausted(&mut self) {
        self.state = DeliveryState::Exhausted;
        self.updated_at = Utc::now();
    }
}

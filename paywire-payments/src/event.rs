//! Notification events sent to webhook subscribers

use crate::PaymentView;
use chrono::NaiveDateTime;
use paywire_webhooks::{WebhookPayload, timestamp};
use serde::{Deserialize, Serialize};

/// Event type for a newly created payment
pub const PAYMENT_CREATED: &str = "PAYMENT_CREATED";

/// Body POSTed to every active subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub event_type: String,
    #[serde(with = "paywire_webhooks::timestamp")]
    pub timestamp: NaiveDateTime,
    pub payment: PaymentView,
}

impl NotificationEvent {
    /// A `PAYMENT_CREATED` event stamped with the current local time
    pub fn payment_created(payment: PaymentView) -> Self {
        Self {
            event_type: PAYMENT_CREATED.to_string(),
            timestamp: timestamp::now(),
            payment,
        }
    }

    /// Serialize once for delivery to every subscriber
    pub fn to_payload(&self) -> paywire_webhooks::Result<WebhookPayload> {
        WebhookPayload::from_event(self.event_type.clone(), self)
    }
}

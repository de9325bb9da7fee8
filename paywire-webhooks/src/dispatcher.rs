//! Fan-out of one event to many subscribers

use crate::{RetryScheduler, Subscriber, WebhookPayload};
use tracing::info;

/// Launches one independent delivery per active subscriber.
///
/// Nothing is awaited: a slow or failing subscriber never delays another,
/// and the caller gets control back as soon as the tasks are spawned.
#[derive(Debug, Clone)]
pub struct DispatchCoordinator {
    scheduler: RetryScheduler,
}

impl DispatchCoordinator {
    pub fn new(scheduler: RetryScheduler) -> Self {
        Self { scheduler }
    }

    pub fn scheduler(&self) -> &RetryScheduler {
        &self.scheduler
    }

    /// Spawn a delivery task for each active subscriber and return how many
    /// were launched. Inactive entries are skipped.
    pub fn dispatch(&self, payload: &WebhookPayload, subscribers: &[Subscriber]) -> usize {
        let mut launched = 0;

        for subscriber in subscribers.iter().filter(|s| s.active) {
            // Detached; the task finishes on its own
            let _ = self.scheduler.deliver(subscriber.url.clone(), payload.clone());
            launched += 1;
        }

        if launched == 0 {
            info!(
                event_type = payload.event_type(),
                "No active webhooks to notify"
            );
        } else {
            info!(
                event_type = payload.event_type(),
                subscribers = launched,
                "Dispatched webhook notifications"
            );
        }

        launched
    }
}

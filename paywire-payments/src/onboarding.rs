//! Payment creation flow

use crate::{
    CardProtector, CreatePaymentRequest, NewPayment, NotificationEvent, PaymentRepository,
    PaymentResult, PaymentView,
};
use paywire_validation::Validate;
use paywire_webhooks::{DispatchCoordinator, SubscriberService};
use std::sync::Arc;
use tracing::{error, info};

/// Validates, protects and stores a payment, then notifies subscribers.
///
/// Notification is fire-and-forget: `create_payment` returns once delivery
/// tasks are spawned, and no delivery outcome can fail the payment.
#[derive(Clone)]
pub struct PaymentOnboarding {
    protector: Arc<CardProtector>,
    payments: Arc<dyn PaymentRepository>,
    subscribers: SubscriberService,
    dispatcher: DispatchCoordinator,
}

impl PaymentOnboarding {
    pub fn new(
        protector: Arc<CardProtector>,
        payments: Arc<dyn PaymentRepository>,
        subscribers: SubscriberService,
        dispatcher: DispatchCoordinator,
    ) -> Self {
        Self {
            protector,
            payments,
            subscribers,
            dispatcher,
        }
    }

    /// Create a payment and notify every active subscriber.
    ///
    /// Invalid input is rejected before any encryption or storage.
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> PaymentResult<PaymentView> {
        request.validate()?;

        let card = self.protector.protect(&request.card_number)?;
        let record = self.payments.save(NewPayment::new(request, card)).await?;
        info!(payment_id = record.id, "Payment created");

        let view = record.view();
        self.notify(&view).await;

        Ok(view)
    }

    /// Look up a stored payment
    pub async fn payment(&self, id: i64) -> PaymentResult<Option<PaymentView>> {
        Ok(self.payments.find_by_id(id).await?.map(|record| record.view()))
    }

    /// All stored payments, ordered by id
    pub async fn payments(&self) -> PaymentResult<Vec<PaymentView>> {
        let records = self.payments.find_all().await?;
        Ok(records.iter().map(|record| record.view()).collect())
    }

    async fn notify(&self, payment: &PaymentView) {
        info!(payment_id = payment.id, "Starting webhook notifications");

        let subscribers = match self.subscribers.active().await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                error!(
                    payment_id = payment.id,
                    error = %e,
                    "Failed to load webhook subscribers, skipping notifications"
                );
                return;
            }
        };

        if subscribers.is_empty() {
            info!(payment_id = payment.id, "No active webhooks to notify");
            return;
        }

        let event = NotificationEvent::payment_created(payment.clone());
        match event.to_payload() {
            Ok(payload) => {
                self.dispatcher.dispatch(&payload, &subscribers);
            }
            Err(e) => {
                error!(
                    payment_id = payment.id,
                    error = %e,
                    "Failed to serialize notification event"
                );
            }
        }
    }
}

impl std::fmt::Debug for PaymentOnboarding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentOnboarding")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

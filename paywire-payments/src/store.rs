//! Payment persistence

use crate::{NewPayment, PaymentRecord, PaymentResult};
use async_trait::async_trait;
use paywire_webhooks::timestamp;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage for payments
///
/// Implement this trait for each backing store.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Store a payment, assigning its id and creation time
    async fn save(&self, payment: NewPayment) -> PaymentResult<PaymentRecord>;

    async fn find_by_id(&self, id: i64) -> PaymentResult<Option<PaymentRecord>>;

    /// All payments, ordered by id
    async fn find_all(&self) -> PaymentResult<Vec<PaymentRecord>>;
}

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    payments: BTreeMap<i64, PaymentRecord>,
}

/// Process-local payment store with ids starting at 1
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: NewPayment) -> PaymentResult<PaymentRecord> {
        let mut store = self.write();
        store.next_id += 1;

        let record = PaymentRecord {
            id: store.next_id,
            first_name: payment.first_name,
            last_name: payment.last_name,
            zip_code: payment.zip_code,
            card_number_encrypted: payment.card.encrypted,
            card_number_masked: payment.card.masked,
            created_at: timestamp::now(),
        };
        store.payments.insert(record.id, record.clone());

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> PaymentResult<Option<PaymentRecord>> {
        Ok(self.read().payments.get(&id).cloned())
    }

    async fn find_all(&self) -> PaymentResult<Vec<PaymentRecord>> {
        Ok(self.read().payments.values().cloned().collect())
    }
}

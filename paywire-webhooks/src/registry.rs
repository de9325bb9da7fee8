//! Subscriber storage and management

use crate::{CreateSubscriberRequest, NewSubscriber, Result, Subscriber, WebhookError, timestamp};
use async_trait::async_trait;
use paywire_validation::Validate;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

/// Persistence for subscribers
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Store a new subscriber, assigning its id and creation time
    async fn save(&self, subscriber: NewSubscriber) -> Result<Subscriber>;

    /// All subscribers, ordered by id
    async fn find_all(&self) -> Result<Vec<Subscriber>>;

    /// Active subscribers, ordered by id
    async fn find_active(&self) -> Result<Vec<Subscriber>>;

    async fn exists_by_id(&self, id: i64) -> Result<bool>;

    async fn delete_by_id(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    subscribers: BTreeMap<i64, Subscriber>,
}

/// Process-local subscriber store with ids starting at 1
#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriberRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemorySubscriberRepository {
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
impl SubscriberRepository for InMemorySubscriberRepository {
    async fn save(&self, subscriber: NewSubscriber) -> Result<Subscriber> {
        let mut store = self.write();
        store.next_id += 1;

        let saved = Subscriber {
            id: store.next_id,
            url: subscriber.url,
            description: subscriber.description,
            active: subscriber.active,
            created_at: timestamp::now(),
        };
        store.subscribers.insert(saved.id, saved.clone());

        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Subscriber>> {
        Ok(self.read().subscribers.values().cloned().collect())
    }

    async fn find_active(&self) -> Result<Vec<Subscriber>> {
        Ok(self
            .read()
            .subscribers
            .values()
            .filter(|s| s.active)
            .cloned()
            .collect())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.read().subscribers.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.write().subscribers.remove(&id);
        Ok(())
    }
}

/// Registers, lists and removes subscribers
#[derive(Clone)]
pub struct SubscriberService {
    repository: Arc<dyn SubscriberRepository>,
}

impl SubscriberService {
    pub fn new(repository: Arc<dyn SubscriberRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store a new, active subscriber
    pub async fn create(&self, request: CreateSubscriberRequest) -> Result<Subscriber> {
        request.validate()?;

        info!(url = %request.url, "Creating webhook subscriber");
        let subscriber = self.repository.save(request.into()).await?;
        info!(subscriber_id = subscriber.id, "Webhook subscriber created");

        Ok(subscriber)
    }

    pub async fn list(&self) -> Result<Vec<Subscriber>> {
        self.repository.find_all().await
    }

    /// Fresh snapshot of the subscribers that should be notified
    pub async fn active(&self) -> Result<Vec<Subscriber>> {
        self.repository.find_active().await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(WebhookError::SubscriberNotFound(id));
        }

        self.repository.delete_by_id(id).await?;
        info!(subscriber_id = id, "Webhook subscriber deleted");
        Ok(())
    }
}

impl std::fmt::Debug for SubscriberService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberService").finish_non_exhaustive()
    }
}

// TestDependencies - in-memory stores and mock collaborators for testing
//
// Builds a ServerDeps with no database so domain actions and the GraphQL
// schema can be exercised directly.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{ActorRecord, BaseActorDirectory, BaseNotifier, ServerDeps, StreamHub};
use crate::common::{AccountId, ActorRole, Page, RequestId, ValidatedPageArgs};
use crate::config::{LifecyclePolicy, RetryPolicy};
use crate::domains::analytics::store::InMemoryViewEventLog;
use crate::domains::auth::JwtService;
use crate::domains::collaboration::events::CollaborationEvent;
use crate::domains::collaboration::models::{
    CollaborationRequest, CollaborationStatus, NewCollaborationRequest, RequestPatch,
};
use crate::domains::collaboration::store::{
    InMemoryRequestStore, ListFilter, RequestScope, RequestStore, StaleCursor, StoreError,
};

pub const TEST_JWT_SECRET: &str = "test-secret-key";
pub const TEST_JWT_ISSUER: &str = "collab-test";

// =============================================================================
// Mock Actor Directory
// =============================================================================

#[derive(Default)]
pub struct MockActorDirectory {
    accounts: Mutex<HashMap<AccountId, ActorRecord>>,
}

impl MockActorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active account and return its id.
    pub fn register(&self, role: ActorRole) -> AccountId {
        let id = AccountId::new();
        self.insert(ActorRecord {
            id,
            role,
            is_active: true,
        });
        id
    }

    pub fn insert(&self, record: ActorRecord) {
        self.accounts.lock().unwrap().insert(record.id, record);
    }

    pub fn deactivate(&self, id: AccountId) {
        if let Some(record) = self.accounts.lock().unwrap().get_mut(&id) {
            record.is_active = false;
        }
    }
}

#[async_trait]
impl BaseActorDirectory for MockActorDirectory {
    async fn resolve(&self, account_id: AccountId) -> Result<Option<ActorRecord>> {
        Ok(self.accounts.lock().unwrap().get(&account_id).copied())
    }
}

// =============================================================================
// Notifiers
// =============================================================================

/// Records every event it is asked to deliver.
#[derive(Default)]
pub struct SpyNotifier {
    events: Mutex<Vec<CollaborationEvent>>,
}

impl SpyNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CollaborationEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

#[async_trait]
impl BaseNotifier for SpyNotifier {
    async fn notify(&self, event: &CollaborationEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Always fails delivery.
pub struct FailingNotifier;

#[async_trait]
impl BaseNotifier for FailingNotifier {
    async fn notify(&self, _event: &CollaborationEvent) -> Result<()> {
        anyhow::bail!("notification service unreachable")
    }
}

/// Never finishes within any reasonable timeout.
pub struct HangingNotifier;

#[async_trait]
impl BaseNotifier for HangingNotifier {
    async fn notify(&self, _event: &CollaborationEvent) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

// =============================================================================
// Faulty Request Store
// =============================================================================

/// Delegates to another store but fails status writes for chosen records.
pub struct FaultyRequestStore {
    inner: Arc<dyn RequestStore>,
    broken: Mutex<HashSet<RequestId>>,
}

impl FaultyRequestStore {
    pub fn new(inner: Arc<dyn RequestStore>) -> Self {
        Self {
            inner,
            broken: Mutex::new(HashSet::new()),
        }
    }

    /// Make every `update_status` on `id` fail until [`Self::repair`].
    pub fn break_record(&self, id: RequestId) {
        self.broken.lock().unwrap().insert(id);
    }

    pub fn repair(&self, id: RequestId) {
        self.broken.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl RequestStore for FaultyRequestStore {
    async fn create(
        &self,
        new: NewCollaborationRequest,
    ) -> Result<CollaborationRequest, StoreError> {
        self.inner.create(new).await
    }

    async fn get(&self, id: RequestId) -> Result<CollaborationRequest, StoreError> {
        self.inner.get(id).await
    }

    async fn find_active(
        &self,
        brand_id: AccountId,
        creator_id: AccountId,
    ) -> Result<Option<CollaborationRequest>, StoreError> {
        self.inner.find_active(brand_id, creator_id).await
    }

    async fn list_by_actor(
        &self,
        actor_id: AccountId,
        role: ActorRole,
        filter: &ListFilter,
        page: &ValidatedPageArgs,
    ) -> Result<Page<CollaborationRequest>, StoreError> {
        self.inner.list_by_actor(actor_id, role, filter, page).await
    }

    async fn update_status(
        &self,
        id: RequestId,
        expected: CollaborationStatus,
        next: CollaborationStatus,
        patch: RequestPatch,
    ) -> Result<CollaborationRequest, StoreError> {
        if self.broken.lock().unwrap().contains(&id) {
            return Err(StoreError::Conflict(format!("write to {} rejected", id)));
        }
        self.inner.update_status(id, expected, next, patch).await
    }

    async fn mark_viewed(
        &self,
        id: RequestId,
        at: DateTime<Utc>,
    ) -> Result<CollaborationRequest, StoreError> {
        self.inner.mark_viewed(id, at).await
    }

    async fn find_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
        after: Option<StaleCursor>,
        limit: i64,
    ) -> Result<Vec<CollaborationRequest>, StoreError> {
        self.inner.find_stale_pending(cutoff, after, limit).await
    }

    async fn scan(&self, scope: &RequestScope) -> Result<Vec<CollaborationRequest>, StoreError> {
        self.inner.scan(scope).await
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub requests: Arc<InMemoryRequestStore>,
    pub view_events: Arc<InMemoryViewEventLog>,
    pub directory: Arc<MockActorDirectory>,
    pub notifier: Arc<SpyNotifier>,
    pub notifier_override: Option<Arc<dyn BaseNotifier>>,
    pub lifecycle: LifecyclePolicy,
    pub retry: RetryPolicy,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(InMemoryRequestStore::new()),
            view_events: Arc::new(InMemoryViewEventLog::new()),
            directory: Arc::new(MockActorDirectory::new()),
            notifier: Arc::new(SpyNotifier::new()),
            notifier_override: None,
            lifecycle: LifecyclePolicy::default(),
            retry: RetryPolicy {
                attempts: 2,
                base_delay_ms: 1,
                max_delay_ms: 5,
            },
        }
    }

    /// Replace the spy notifier with another implementation.
    pub fn notifier(mut self, notifier: Arc<dyn BaseNotifier>) -> Self {
        self.notifier_override = Some(notifier);
        self
    }

    pub fn lifecycle(mut self, lifecycle: LifecyclePolicy) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn into_server_deps(self) -> ServerDeps {
        let notifier: Arc<dyn BaseNotifier> = match self.notifier_override {
            Some(notifier) => notifier,
            None => self.notifier,
        };
        ServerDeps::new(
            self.requests,
            self.view_events,
            self.directory,
            notifier,
            Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())),
            StreamHub::new(),
            self.lifecycle,
            self.retry,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

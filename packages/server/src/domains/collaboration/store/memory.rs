//! In-process request store.
//!
//! A single async mutex serialises every write, which gives the same
//! guarantees as the Postgres unique index and conditional update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{ListFilter, RequestScope, RequestStore, StaleCursor, StoreError};
use crate::common::{AccountId, ActorRole, Page, RequestId, ValidatedPageArgs};
use crate::domains::collaboration::models::{
    CollaborationRequest, CollaborationStatus, Negotiation, NewCollaborationRequest,
    RequestPatch,
};

#[derive(Default)]
pub struct InMemoryRequestStore {
    records: Mutex<HashMap<RequestId, CollaborationRequest>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record exactly as given, bypassing the duplicate guard.
    /// Used to load fixtures with historical timestamps.
    pub async fn seed(&self, request: CollaborationRequest) {
        self.records.lock().await.insert(request.id, request);
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

fn newest_first(a: &CollaborationRequest, b: &CollaborationRequest) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn create(
        &self,
        new: NewCollaborationRequest,
    ) -> Result<CollaborationRequest, StoreError> {
        let mut records = self.records.lock().await;

        if let Some(existing) = records.values().find(|r| {
            r.brand_id == new.brand_id && r.creator_id == new.creator_id && r.status.is_active()
        }) {
            return Err(StoreError::DuplicateActive {
                existing_id: existing.id,
            });
        }

        let now = Utc::now();
        let request = CollaborationRequest {
            id: RequestId::new(),
            brand_id: new.brand_id,
            creator_id: new.creator_id,
            terms: new.terms,
            status: CollaborationStatus::Pending,
            negotiation: Negotiation::default(),
            viewed_at: None,
            response_latency_secs: None,
            created_at: now,
            updated_at: now,
        };
        records.insert(request.id, request.clone());
        Ok(request)
    }

    async fn get(&self, id: RequestId) -> Result<CollaborationRequest, StoreError> {
        self.records
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_active(
        &self,
        brand_id: AccountId,
        creator_id: AccountId,
    ) -> Result<Option<CollaborationRequest>, StoreError> {
        Ok(self
            .records
            .lock()
            .await
            .values()
            .find(|r| r.brand_id == brand_id && r.creator_id == creator_id && r.status.is_active())
            .cloned())
    }

    async fn list_by_actor(
        &self,
        actor_id: AccountId,
        role: ActorRole,
        filter: &ListFilter,
        page: &ValidatedPageArgs,
    ) -> Result<Page<CollaborationRequest>, StoreError> {
        let records = self.records.lock().await;
        let mut matching: Vec<CollaborationRequest> = records
            .values()
            .filter(|r| match role {
                ActorRole::Brand => r.brand_id == actor_id,
                ActorRole::Creator => r.creator_id == actor_id,
                ActorRole::Admin => true,
            })
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        drop(records);

        matching.sort_by(newest_first);
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();

        Ok(Page::new(items, total, page))
    }

    async fn update_status(
        &self,
        id: RequestId,
        expected: CollaborationStatus,
        next: CollaborationStatus,
        patch: RequestPatch,
    ) -> Result<CollaborationRequest, StoreError> {
        let mut records = self.records.lock().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound)?;

        if record.status != expected {
            return Err(StoreError::StatusMismatch {
                actual: record.status,
            });
        }

        record.apply(next, patch, Utc::now());
        Ok(record.clone())
    }

    async fn mark_viewed(
        &self,
        id: RequestId,
        at: DateTime<Utc>,
    ) -> Result<CollaborationRequest, StoreError> {
        let mut records = self.records.lock().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound)?;
        if record.viewed_at.is_none() {
            record.viewed_at = Some(at);
        }
        Ok(record.clone())
    }

    async fn find_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
        after: Option<StaleCursor>,
        limit: i64,
    ) -> Result<Vec<CollaborationRequest>, StoreError> {
        let mut stale: Vec<CollaborationRequest> = self
            .records
            .lock()
            .await
            .values()
            .filter(|r| r.status == CollaborationStatus::Pending && r.updated_at < cutoff)
            .filter(|r| after.map_or(true, |cursor| StaleCursor::from(*r) > cursor))
            .cloned()
            .collect();
        stale.sort_by_key(|r| StaleCursor::from(r));
        stale.truncate(limit.max(0) as usize);
        Ok(stale)
    }

    async fn scan(&self, scope: &RequestScope) -> Result<Vec<CollaborationRequest>, StoreError> {
        let mut matching: Vec<CollaborationRequest> = self
            .records
            .lock()
            .await
            .values()
            .filter(|r| scope.matches(r))
            .cloned()
            .collect();
        matching.sort_by(newest_first);
        Ok(matching)
    }
}

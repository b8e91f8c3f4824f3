//! Persistence contract for collaboration requests.
//!
//! The store is the only coordination point between concurrent engine calls:
//! creation is atomic with the duplicate guard and every status write is a
//! compare-and-swap on the expected prior status.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use typed_builder::TypedBuilder;

use super::models::{
    CampaignType, CollaborationRequest, CollaborationStatus, NewCollaborationRequest,
    RequestPatch,
};
use crate::common::{AccountId, Actor, ActorRole, Page, RequestId, ValidatedPageArgs};

pub use memory::InMemoryRequestStore;
pub use postgres::PostgresRequestStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("stored status is {actual}")]
    StatusMismatch { actual: CollaborationStatus },

    #[error("active request {existing_id} already holds this pair")]
    DuplicateActive { existing_id: RequestId },

    #[error("conflict: {0}")]
    Conflict(String),

    /// Transient I/O failure; safe to retry for reads.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Listing filter for per-actor request lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilter {
    pub status: Option<CollaborationStatus>,
}

/// Keyset position in the stale-pending ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StaleCursor {
    pub updated_at: DateTime<Utc>,
    pub id: RequestId,
}

impl From<&CollaborationRequest> for StaleCursor {
    fn from(request: &CollaborationRequest) -> Self {
        Self {
            updated_at: request.updated_at,
            id: request.id,
        }
    }
}

/// Narrowing applied to analytics scans.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct RequestScope {
    #[builder(default, setter(strip_option))]
    pub brand_id: Option<AccountId>,
    #[builder(default, setter(strip_option))]
    pub creator_id: Option<AccountId>,
    #[builder(default, setter(strip_option))]
    pub created_from: Option<DateTime<Utc>>,
    #[builder(default, setter(strip_option))]
    pub created_to: Option<DateTime<Utc>>,
    #[builder(default, setter(strip_option))]
    pub campaign_type: Option<CampaignType>,
}

impl RequestScope {
    /// Force the scope onto the caller's own requests unless they are an
    /// admin.
    pub fn restricted_to(mut self, actor: &Actor) -> Self {
        match actor.role {
            ActorRole::Admin => {}
            ActorRole::Brand => self.brand_id = Some(actor.id),
            ActorRole::Creator => self.creator_id = Some(actor.id),
        }
        self
    }

    pub fn matches(&self, request: &CollaborationRequest) -> bool {
        self.brand_id.map_or(true, |id| request.brand_id == id)
            && self.creator_id.map_or(true, |id| request.creator_id == id)
            && self.created_from.map_or(true, |from| request.created_at >= from)
            && self.created_to.map_or(true, |to| request.created_at < to)
            && self
                .campaign_type
                .map_or(true, |t| request.terms.campaign_type == t)
    }
}

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Insert a pending request, failing with `DuplicateActive` if the pair
    /// already has an active one. Check and insert are a single atomic step.
    async fn create(&self, new: NewCollaborationRequest)
        -> Result<CollaborationRequest, StoreError>;

    async fn get(&self, id: RequestId) -> Result<CollaborationRequest, StoreError>;

    async fn find_active(
        &self,
        brand_id: AccountId,
        creator_id: AccountId,
    ) -> Result<Option<CollaborationRequest>, StoreError>;

    /// Requests where the account is the brand (`Brand`), the creator
    /// (`Creator`), or every request (`Admin`), newest first.
    async fn list_by_actor(
        &self,
        actor_id: AccountId,
        role: ActorRole,
        filter: &ListFilter,
        page: &ValidatedPageArgs,
    ) -> Result<Page<CollaborationRequest>, StoreError>;

    /// Compare-and-swap: write `next` and `patch` only if the stored status
    /// still equals `expected`, otherwise `StatusMismatch` with what is there.
    async fn update_status(
        &self,
        id: RequestId,
        expected: CollaborationStatus,
        next: CollaborationStatus,
        patch: RequestPatch,
    ) -> Result<CollaborationRequest, StoreError>;

    /// Stamp `viewed_at` unless already set. Does not count as activity.
    async fn mark_viewed(
        &self,
        id: RequestId,
        at: DateTime<Utc>,
    ) -> Result<CollaborationRequest, StoreError>;

    /// Pending requests whose last activity is before `cutoff`, ordered by
    /// `(updated_at, id)` and starting strictly after `after` when given.
    async fn find_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
        after: Option<StaleCursor>,
        limit: i64,
    ) -> Result<Vec<CollaborationRequest>, StoreError>;

    async fn scan(&self, scope: &RequestScope) -> Result<Vec<CollaborationRequest>, StoreError>;
}

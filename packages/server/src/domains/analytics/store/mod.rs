//! Append-only log of profile views.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::{NewViewEvent, ViewEvent};
use crate::common::{AccountId, ActorRole};
use crate::domains::collaboration::store::StoreError;

pub use memory::InMemoryViewEventLog;
pub use postgres::PostgresViewEventLog;

#[async_trait]
pub trait ViewEventLog: Send + Sync {
    async fn append(&self, event: NewViewEvent) -> Result<ViewEvent, StoreError>;

    /// Every view of one subject, oldest first.
    async fn for_subject(&self, subject_id: AccountId) -> Result<Vec<ViewEvent>, StoreError>;

    /// Views of subjects of the given type at or after `since`.
    async fn since(
        &self,
        subject_type: ActorRole,
        since: DateTime<Utc>,
    ) -> Result<Vec<ViewEvent>, StoreError>;
}

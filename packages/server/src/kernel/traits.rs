// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Lifecycle rules live in domain actions that call through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseNotifier)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{AccountId, ActorRole};
use crate::domains::collaboration::events::CollaborationEvent;

// =============================================================================
// Actor Directory (Identity collaborator)
// =============================================================================

/// What the identity system knows about an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct ActorRecord {
    pub id: AccountId,
    pub role: ActorRole,
    pub is_active: bool,
}

#[async_trait]
pub trait BaseActorDirectory: Send + Sync {
    /// Look up an account; `None` when the id is unknown.
    async fn resolve(&self, account_id: AccountId) -> Result<Option<ActorRecord>>;
}

// =============================================================================
// Notifier (Notification collaborator)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Deliver an event. Callers never roll back on failure.
    async fn notify(&self, event: &CollaborationEvent) -> Result<()>;
}

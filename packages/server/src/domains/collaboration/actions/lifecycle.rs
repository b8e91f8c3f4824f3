//! Steps shared by every lifecycle action: load, ownership, lazy expiry and
//! the compare-and-swap commit.

use chrono::Utc;
use tracing::info;

use crate::common::{Actor, RequestId};
use crate::domains::collaboration::errors::CollaborationError;
use crate::domains::collaboration::events::CollaborationEvent;
use crate::domains::collaboration::models::{
    CollaborationRequest, CollaborationStatus, RequestPatch, MAX_MESSAGE_LEN,
};
use crate::domains::collaboration::store::StoreError;
use crate::kernel::{notifier, retry_read, ServerDeps};

pub(crate) async fn load(
    id: RequestId,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    retry_read(&deps.retry, "get_request", || deps.requests.get(id))
        .await
        .map_err(|e| CollaborationError::from_store(e, id, "load"))
}

pub(crate) fn require_creator(
    request: &CollaborationRequest,
    actor: &Actor,
) -> Result<(), CollaborationError> {
    if actor.id == request.creator_id {
        Ok(())
    } else {
        Err(CollaborationError::Forbidden(
            "only the invited creator can do this".to_string(),
        ))
    }
}

pub(crate) fn require_brand(
    request: &CollaborationRequest,
    actor: &Actor,
) -> Result<(), CollaborationError> {
    if actor.id == request.brand_id {
        Ok(())
    } else {
        Err(CollaborationError::Forbidden(
            "only the requesting brand can do this".to_string(),
        ))
    }
}

pub(crate) fn require_participant(
    request: &CollaborationRequest,
    actor: &Actor,
) -> Result<(), CollaborationError> {
    if request.is_participant(actor.id) {
        Ok(())
    } else {
        Err(CollaborationError::Forbidden(
            "not a party to this collaboration".to_string(),
        ))
    }
}

pub(crate) fn ensure_edge(
    request: &CollaborationRequest,
    next: CollaborationStatus,
    attempted: &str,
) -> Result<(), CollaborationError> {
    if request.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(CollaborationError::invalid_transition(request.status, attempted))
    }
}

/// Trimmed, non-empty, bounded free-text message.
pub(crate) fn clean_message(message: &str) -> Result<String, CollaborationError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(CollaborationError::Validation("message is required".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(CollaborationError::Validation(format!(
            "message must be at most {} characters",
            MAX_MESSAGE_LEN
        )));
    }
    Ok(message.to_string())
}

/// Expire a pending request whose TTL has lapsed before acting on it.
///
/// Returns `InvalidTransition` when the request was (or just became) expired
/// so the caller's action never applies to a stale offer.
pub(crate) async fn expire_if_stale(
    request: &CollaborationRequest,
    attempted: &str,
    deps: &ServerDeps,
) -> Result<(), CollaborationError> {
    if !request.is_stale(Utc::now(), deps.lifecycle.request_ttl) {
        return Ok(());
    }

    match deps
        .requests
        .update_status(
            request.id,
            CollaborationStatus::Pending,
            CollaborationStatus::Expired,
            RequestPatch::default(),
        )
        .await
    {
        Ok(expired) => {
            info!(request_id = %expired.id, "Stale collaboration request expired on access");
            notifier::dispatch(
                deps,
                CollaborationEvent::RequestExpired {
                    request: (&expired).into(),
                },
            )
            .await;
            Err(CollaborationError::invalid_transition(
                CollaborationStatus::Expired,
                attempted,
            ))
        }
        Err(StoreError::StatusMismatch { actual }) => {
            Err(CollaborationError::invalid_transition(actual, attempted))
        }
        Err(e) => Err(CollaborationError::from_store(e, request.id, attempted)),
    }
}

/// CAS from the status we read to `next`. Losing the race surfaces as
/// `InvalidTransition` naming the status that won.
pub(crate) async fn commit(
    request: &CollaborationRequest,
    next: CollaborationStatus,
    patch: RequestPatch,
    attempted: &str,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    deps.requests
        .update_status(request.id, request.status, next, patch)
        .await
        .map_err(|e| CollaborationError::from_store(e, request.id, attempted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_message_shares_terms_length_limit() {
        assert_eq!(clean_message("  hello  ").unwrap(), "hello");
        assert!(clean_message("   ").is_err());
        assert!(clean_message(&"x".repeat(MAX_MESSAGE_LEN)).is_ok());
        assert!(matches!(
            clean_message(&"x".repeat(MAX_MESSAGE_LEN + 1)),
            Err(CollaborationError::Validation(_))
        ));
    }
}

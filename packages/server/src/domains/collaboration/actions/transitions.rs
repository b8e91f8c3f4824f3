//! Status transitions: creator decisions, brand cancellation, completion and
//! the admin override.

use chrono::Utc;
use tracing::info;

use super::lifecycle::{
    commit, ensure_edge, expire_if_stale, load, require_brand, require_creator,
    require_participant,
};
use crate::common::{AccountId, Actor, RequestId};
use crate::domains::collaboration::errors::CollaborationError;
use crate::domains::collaboration::events::{CollaborationEvent, RequestRef};
use crate::domains::collaboration::models::{
    CollaborationRequest, CollaborationStatus, RequestPatch,
};
use crate::kernel::{notifier, ServerDeps};

/// Creator accepts a pending request.
pub async fn accept_request(
    request_id: RequestId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    decide(request_id, actor, CollaborationStatus::Accepted, "accept", deps).await
}

/// Creator declines a pending request.
pub async fn reject_request(
    request_id: RequestId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    decide(request_id, actor, CollaborationStatus::Rejected, "reject", deps).await
}

async fn decide(
    request_id: RequestId,
    actor: &Actor,
    next: CollaborationStatus,
    attempted: &str,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    let request = load(request_id, deps).await?;
    require_creator(&request, actor)?;
    expire_if_stale(&request, attempted, deps).await?;
    ensure_edge(&request, next, attempted)?;

    let patch = RequestPatch {
        response_latency_secs: request.latency_at(Utc::now()),
        ..Default::default()
    };
    let updated = commit(&request, next, patch, attempted, deps).await?;

    info!(
        request_id = %request_id,
        creator_id = %actor.id,
        status = %next,
        "Creator decided on collaboration request"
    );

    if let Some(event) = transition_event(next, (&updated).into(), actor.id) {
        notifier::dispatch(deps, event).await;
    }
    Ok(updated)
}

/// Brand withdraws a pending request or calls off an accepted one.
pub async fn cancel_request(
    request_id: RequestId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    let attempted = "cancel";
    let request = load(request_id, deps).await?;
    require_brand(&request, actor)?;
    expire_if_stale(&request, attempted, deps).await?;
    ensure_edge(&request, CollaborationStatus::Cancelled, attempted)?;

    let updated = commit(
        &request,
        CollaborationStatus::Cancelled,
        RequestPatch::default(),
        attempted,
        deps,
    )
    .await?;

    info!(request_id = %request_id, brand_id = %actor.id, "Collaboration request cancelled");

    notifier::dispatch(
        deps,
        CollaborationEvent::RequestCancelled {
            request: (&updated).into(),
            cancelled_by: actor.id,
        },
    )
    .await;
    Ok(updated)
}

/// Mark an accepted collaboration as delivered. Either party may confirm.
pub async fn complete_request(
    request_id: RequestId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    let attempted = "complete";
    let request = load(request_id, deps).await?;
    require_participant(&request, actor)?;
    ensure_edge(&request, CollaborationStatus::Completed, attempted)?;

    let updated = commit(
        &request,
        CollaborationStatus::Completed,
        RequestPatch::default(),
        attempted,
        deps,
    )
    .await?;

    info!(request_id = %request_id, completed_by = %actor.id, "Collaboration completed");

    notifier::dispatch(
        deps,
        CollaborationEvent::RequestCompleted {
            request: (&updated).into(),
            completed_by: actor.id,
        },
    )
    .await;
    Ok(updated)
}

/// Admin override. Skips ownership checks but still only follows edges of
/// the lifecycle graph.
pub async fn admin_set_status(
    request_id: RequestId,
    status: CollaborationStatus,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    actor.require_admin()?;

    let attempted = format!("set status to {} on", status);
    let request = load(request_id, deps).await?;
    ensure_edge(&request, status, &attempted)?;

    let updated = commit(&request, status, RequestPatch::default(), &attempted, deps).await?;

    info!(
        request_id = %request_id,
        admin_id = %actor.id,
        from = %request.status,
        to = %status,
        "Admin changed collaboration status"
    );

    if let Some(event) = transition_event(status, (&updated).into(), actor.id) {
        notifier::dispatch(deps, event).await;
    }
    Ok(updated)
}

fn transition_event(
    status: CollaborationStatus,
    request: RequestRef,
    actor_id: AccountId,
) -> Option<CollaborationEvent> {
    match status {
        CollaborationStatus::Accepted => Some(CollaborationEvent::RequestAccepted { request }),
        CollaborationStatus::Rejected => Some(CollaborationEvent::RequestRejected { request }),
        CollaborationStatus::Cancelled => Some(CollaborationEvent::RequestCancelled {
            request,
            cancelled_by: actor_id,
        }),
        CollaborationStatus::Completed => Some(CollaborationEvent::RequestCompleted {
            request,
            completed_by: actor_id,
        }),
        CollaborationStatus::Expired => Some(CollaborationEvent::RequestExpired { request }),
        CollaborationStatus::Pending => None,
    }
}

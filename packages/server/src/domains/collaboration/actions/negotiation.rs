//! Message exchange attached to a request. Nothing here changes status; each
//! write is a same-status CAS so it cannot land on a request that moved on.

use chrono::Utc;
use tracing::info;

use super::lifecycle::{
    clean_message, commit, expire_if_stale, load, require_brand, require_creator,
};
use crate::common::{Actor, ActorRole, RequestId};
use crate::domains::collaboration::errors::CollaborationError;
use crate::domains::collaboration::events::CollaborationEvent;
use crate::domains::collaboration::models::{
    BrandResponse, CollaborationRequest, CollaborationStatus, CounterOffer, CreatorResponse,
    RequestPatch, TermsUpdate,
};
use crate::kernel::{notifier, ServerDeps};

/// Creator answers a pending request, optionally proposing different terms.
/// Accepting or rejecting remains a separate, explicit step.
pub async fn respond_to_request(
    request_id: RequestId,
    actor: &Actor,
    message: &str,
    counter_offer: Option<CounterOffer>,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    let attempted = "respond to";
    let message = clean_message(message)?;
    if let Some(counter) = &counter_offer {
        counter.validate()?;
    }

    let request = load(request_id, deps).await?;
    require_creator(&request, actor)?;
    expire_if_stale(&request, attempted, deps).await?;
    if request.status != CollaborationStatus::Pending {
        return Err(CollaborationError::invalid_transition(request.status, attempted));
    }

    let now = Utc::now();
    let has_counter = counter_offer.is_some();
    let patch = RequestPatch {
        creator_response: Some(CreatorResponse {
            message,
            counter_offer,
            responded_at: now,
        }),
        response_latency_secs: request.latency_at(now),
        ..Default::default()
    };
    let updated = commit(&request, CollaborationStatus::Pending, patch, attempted, deps).await?;

    info!(
        request_id = %request_id,
        creator_id = %actor.id,
        counter_offer = has_counter,
        "Creator responded to collaboration request"
    );

    notifier::dispatch(
        deps,
        CollaborationEvent::ResponseReceived {
            request: (&updated).into(),
            from: ActorRole::Creator,
        },
    )
    .await;
    Ok(updated)
}

/// Brand replies on any request that is still open.
pub async fn reply_to_request(
    request_id: RequestId,
    actor: &Actor,
    message: &str,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    let attempted = "reply to";
    let message = clean_message(message)?;

    let request = load(request_id, deps).await?;
    require_brand(&request, actor)?;
    expire_if_stale(&request, attempted, deps).await?;
    if request.status.is_terminal() {
        return Err(CollaborationError::invalid_transition(request.status, attempted));
    }

    let patch = RequestPatch {
        brand_response: Some(BrandResponse {
            message,
            responded_at: Utc::now(),
        }),
        ..Default::default()
    };
    let updated = commit(&request, request.status, patch, attempted, deps).await?;

    info!(request_id = %request_id, brand_id = %actor.id, "Brand replied to collaboration request");

    notifier::dispatch(
        deps,
        CollaborationEvent::ResponseReceived {
            request: (&updated).into(),
            from: ActorRole::Brand,
        },
    )
    .await;
    Ok(updated)
}

/// Brand revises the offer while it is still pending.
pub async fn update_terms(
    request_id: RequestId,
    actor: &Actor,
    update: TermsUpdate,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    let attempted = "update terms of";
    if update.is_empty() {
        return Err(CollaborationError::Validation(
            "terms update contains no changes".to_string(),
        ));
    }

    let request = load(request_id, deps).await?;
    require_brand(&request, actor)?;
    expire_if_stale(&request, attempted, deps).await?;
    if request.status != CollaborationStatus::Pending {
        return Err(CollaborationError::invalid_transition(request.status, attempted));
    }

    let terms = update
        .apply_to(&request.terms)
        .normalized(&deps.lifecycle.default_currency);
    terms.validate()?;

    let patch = RequestPatch {
        terms: Some(terms),
        ..Default::default()
    };
    let updated = commit(&request, CollaborationStatus::Pending, patch, attempted, deps).await?;

    info!(request_id = %request_id, brand_id = %actor.id, "Collaboration terms updated");

    notifier::dispatch(
        deps,
        CollaborationEvent::TermsUpdated {
            request: (&updated).into(),
        },
    )
    .await;
    Ok(updated)
}

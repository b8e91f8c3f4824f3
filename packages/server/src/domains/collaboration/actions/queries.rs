use chrono::Utc;
use tracing::warn;

use super::lifecycle::load;
use crate::common::{Actor, ActorRole, Page, PageArgs, RequestId};
use crate::domains::collaboration::errors::CollaborationError;
use crate::domains::collaboration::models::CollaborationRequest;
use crate::domains::collaboration::store::ListFilter;
use crate::kernel::{retry_read, ServerDeps};

/// Fetch one request. Visible to its brand, its creator and admins.
///
/// The creator's first fetch stamps `viewed_at`; failing to stamp it never
/// fails the read.
pub async fn get_request(
    request_id: RequestId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    let request = load(request_id, deps).await?;

    if !actor.is_admin() && !request.is_participant(actor.id) {
        return Err(CollaborationError::Forbidden(
            "not a party to this collaboration".to_string(),
        ));
    }

    if actor.id == request.creator_id && request.viewed_at.is_none() {
        match deps.requests.mark_viewed(request_id, Utc::now()).await {
            Ok(viewed) => return Ok(viewed),
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "Failed to record first view");
            }
        }
    }

    Ok(request)
}

/// The caller's own requests: sent (brands) or received (creators).
pub async fn list_my_requests(
    actor: &Actor,
    filter: ListFilter,
    args: PageArgs,
    deps: &ServerDeps,
) -> Result<Page<CollaborationRequest>, CollaborationError> {
    let page = args.validate()?;
    retry_read(&deps.retry, "list_by_actor", || {
        deps.requests
            .list_by_actor(actor.id, actor.role, &filter, &page)
    })
    .await
    .map_err(Into::into)
}

/// Every request on the platform (admin only).
pub async fn list_all_requests(
    actor: &Actor,
    filter: ListFilter,
    args: PageArgs,
    deps: &ServerDeps,
) -> Result<Page<CollaborationRequest>, CollaborationError> {
    actor.require_admin()?;
    let page = args.validate()?;
    retry_read(&deps.retry, "list_all", || {
        deps.requests
            .list_by_actor(actor.id, ActorRole::Admin, &filter, &page)
    })
    .await
    .map_err(Into::into)
}

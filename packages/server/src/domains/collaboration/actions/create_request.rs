use tracing::info;

use crate::common::{AccountId, Actor, ActorRole};
use crate::domains::collaboration::errors::CollaborationError;
use crate::domains::collaboration::events::CollaborationEvent;
use crate::domains::collaboration::models::{
    CollaborationRequest, NewCollaborationRequest, RequestTerms,
};
use crate::kernel::{notifier, ActorRecord, ServerDeps};

/// Create a pending request from a brand to a creator.
///
/// The duplicate guard runs inside the store's insert, so two concurrent
/// calls for the same pair can never both succeed.
pub async fn create_request(
    actor: &Actor,
    creator_id: AccountId,
    terms: RequestTerms,
    deps: &ServerDeps,
) -> Result<CollaborationRequest, CollaborationError> {
    if actor.role != ActorRole::Brand {
        return Err(CollaborationError::Forbidden(
            "only brands can create collaboration requests".to_string(),
        ));
    }

    let terms = terms.normalized(&deps.lifecycle.default_currency);
    terms.validate()?;

    if actor.id == creator_id {
        return Err(CollaborationError::Validation(
            "a brand cannot send a request to itself".to_string(),
        ));
    }

    let brand = resolve(actor.id, "brand", deps).await?;
    if brand.role != ActorRole::Brand || !brand.is_active {
        return Err(CollaborationError::Forbidden(
            "brand account is not allowed to create requests".to_string(),
        ));
    }

    let creator = resolve(creator_id, "creator", deps).await?;
    if creator.role != ActorRole::Creator {
        return Err(CollaborationError::Validation(format!(
            "account {} is not a creator",
            creator_id
        )));
    }
    if !creator.is_active {
        return Err(CollaborationError::Validation(format!(
            "creator {} is not accepting requests",
            creator_id
        )));
    }

    info!(brand_id = %actor.id, creator_id = %creator_id, "Creating collaboration request");

    let request = deps
        .requests
        .create(NewCollaborationRequest {
            brand_id: actor.id,
            creator_id,
            terms,
        })
        .await?;

    info!(request_id = %request.id, "Collaboration request created");

    notifier::dispatch(
        deps,
        CollaborationEvent::RequestCreated {
            request: (&request).into(),
        },
    )
    .await;

    Ok(request)
}

async fn resolve(
    account_id: AccountId,
    label: &str,
    deps: &ServerDeps,
) -> Result<ActorRecord, CollaborationError> {
    deps.directory
        .resolve(account_id)
        .await
        .map_err(|e| CollaborationError::Unavailable(format!("actor directory: {}", e)))?
        .ok_or_else(|| CollaborationError::NotFound(format!("{} account {}", label, account_id)))
}


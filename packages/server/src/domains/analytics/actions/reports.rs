//! Request-side reports. Read-only: nothing here writes to any store.

use tracing::debug;

use crate::common::{AccountId, Actor, ActorRole};
use crate::domains::analytics::aggregator::{
    self, CampaignTypeBreakdown, EngagementSummary, MonthlyBucket, RevenueSummary,
    StatusDistribution,
};
use crate::domains::collaboration::errors::CollaborationError;
use crate::domains::collaboration::models::CollaborationRequest;
use crate::domains::collaboration::store::RequestScope;
use crate::kernel::{retry_read, ServerDeps};

pub const MAX_TREND_MONTHS: i32 = 120;

/// Load the requests a caller may aggregate over. Non-admins only ever see
/// their own side of the marketplace.
async fn load_scope(
    actor: &Actor,
    scope: RequestScope,
    deps: &ServerDeps,
) -> Result<Vec<CollaborationRequest>, CollaborationError> {
    if let (Some(from), Some(to)) = (scope.created_from, scope.created_to) {
        if from > to {
            return Err(CollaborationError::Validation(
                "scope start must not be after scope end".to_string(),
            ));
        }
    }

    let scope = scope.restricted_to(actor);
    let requests = retry_read(&deps.retry, "scan_requests", || deps.requests.scan(&scope)).await?;
    debug!(actor_id = %actor.id, matched = requests.len(), "Loaded analytics scope");
    Ok(requests)
}

pub async fn status_distribution(
    actor: &Actor,
    scope: RequestScope,
    deps: &ServerDeps,
) -> Result<StatusDistribution, CollaborationError> {
    let requests = load_scope(actor, scope, deps).await?;
    Ok(StatusDistribution::from_requests(&requests))
}

pub async fn campaign_type_breakdown(
    actor: &Actor,
    scope: RequestScope,
    deps: &ServerDeps,
) -> Result<CampaignTypeBreakdown, CollaborationError> {
    let requests = load_scope(actor, scope, deps).await?;
    Ok(CampaignTypeBreakdown::from_requests(&requests))
}

pub async fn monthly_trend(
    actor: &Actor,
    scope: RequestScope,
    months: i32,
    deps: &ServerDeps,
) -> Result<Vec<MonthlyBucket>, CollaborationError> {
    if !(0..=MAX_TREND_MONTHS).contains(&months) {
        return Err(CollaborationError::Validation(format!(
            "months must be between 0 and {}",
            MAX_TREND_MONTHS
        )));
    }
    if months == 0 {
        return Ok(Vec::new());
    }
    let requests = load_scope(actor, scope, deps).await?;
    Ok(aggregator::monthly_trend(&requests, months as usize))
}

pub async fn revenue_summary(
    actor: &Actor,
    scope: RequestScope,
    deps: &ServerDeps,
) -> Result<RevenueSummary, CollaborationError> {
    let requests = load_scope(actor, scope, deps).await?;
    Ok(RevenueSummary::from_requests(&requests))
}

/// Dashboard numbers for one account.
#[derive(Debug, Clone)]
pub struct ActorOverview {
    pub account_id: AccountId,
    pub role: ActorRole,
    pub requests: StatusDistribution,
    pub revenue: RevenueSummary,
    pub engagement: EngagementSummary,
}

/// Overview of the caller, or of `target` when the caller is an admin.
pub async fn actor_overview(
    actor: &Actor,
    target: Option<AccountId>,
    deps: &ServerDeps,
) -> Result<ActorOverview, CollaborationError> {
    let subject = match target {
        Some(id) if id != actor.id => {
            actor.require_admin()?;
            let record = deps
                .directory
                .resolve(id)
                .await
                .map_err(|e| CollaborationError::Unavailable(format!("actor directory: {}", e)))?
                .ok_or_else(|| CollaborationError::NotFound(format!("account {}", id)))?;
            Actor::new(record.id, record.role)
        }
        _ => *actor,
    };

    let requests = load_scope(&subject, RequestScope::default(), deps).await?;
    let events = retry_read(&deps.retry, "views_for_subject", || {
        deps.view_events.for_subject(subject.id)
    })
    .await?;

    Ok(ActorOverview {
        account_id: subject.id,
        role: subject.role,
        requests: StatusDistribution::from_requests(&requests),
        revenue: RevenueSummary::from_requests(&requests),
        engagement: EngagementSummary::from_events(&events),
    })
}

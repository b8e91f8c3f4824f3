use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::common::{AccountId, Actor, ActorRole};
use crate::domains::analytics::aggregator::{self, EngagementSummary, TrendingSubject};
use crate::domains::analytics::models::{InteractionFlags, NewViewEvent, ViewEvent};
use crate::domains::collaboration::errors::CollaborationError;
use crate::kernel::{retry_read, ServerDeps};

pub const DEFAULT_TRENDING_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_TRENDING_LIMIT: i32 = 10;

/// Record that `viewer` (or an anonymous visitor) looked at a profile.
///
/// Owners looking at their own profile are not counted; returns `None`.
pub async fn record_view(
    viewer: Option<&Actor>,
    subject_id: AccountId,
    interactions: InteractionFlags,
    deps: &ServerDeps,
) -> Result<Option<ViewEvent>, CollaborationError> {
    if viewer.map_or(false, |v| v.id == subject_id) {
        return Ok(None);
    }

    let subject = deps
        .directory
        .resolve(subject_id)
        .await
        .map_err(|e| CollaborationError::Unavailable(format!("actor directory: {}", e)))?
        .ok_or_else(|| CollaborationError::NotFound(format!("profile {}", subject_id)))?;
    if subject.role == ActorRole::Admin {
        return Err(CollaborationError::Validation(
            "admin accounts have no public profile".to_string(),
        ));
    }

    let event = deps
        .view_events
        .append(NewViewEvent {
            subject_id,
            subject_type: subject.role,
            viewer_id: viewer.map(|v| v.id),
            viewer_type: viewer.map(|v| v.role),
            interactions,
            occurred_at: Utc::now(),
        })
        .await?;

    info!(subject_id = %subject_id, view_id = %event.id, "Profile view recorded");
    Ok(Some(event))
}

/// View statistics of a profile. Visible to its owner and admins.
pub async fn engagement_summary(
    actor: &Actor,
    subject_id: AccountId,
    deps: &ServerDeps,
) -> Result<EngagementSummary, CollaborationError> {
    if !actor.is_admin() && actor.id != subject_id {
        return Err(CollaborationError::Forbidden(
            "engagement statistics are private to the profile owner".to_string(),
        ));
    }

    let events = retry_read(&deps.retry, "views_for_subject", || {
        deps.view_events.for_subject(subject_id)
    })
    .await?;
    Ok(EngagementSummary::from_events(&events))
}

/// Most-viewed brands or creators since `since` (default: last 30 days).
pub async fn trending_subjects(
    subject_type: ActorRole,
    since: Option<DateTime<Utc>>,
    limit: Option<i32>,
    deps: &ServerDeps,
) -> Result<Vec<TrendingSubject>, CollaborationError> {
    if subject_type == ActorRole::Admin {
        return Err(CollaborationError::Validation(
            "trending subjects are brands or creators".to_string(),
        ));
    }
    let limit = limit.unwrap_or(DEFAULT_TRENDING_LIMIT);
    if !(1..=100).contains(&limit) {
        return Err(CollaborationError::Validation(
            "limit must be between 1 and 100".to_string(),
        ));
    }

    let since =
        since.unwrap_or_else(|| Utc::now() - Duration::days(DEFAULT_TRENDING_WINDOW_DAYS));
    let events = retry_read(&deps.retry, "views_since", || {
        deps.view_events.since(subject_type, since)
    })
    .await?;
    Ok(aggregator::trending(&events, limit as usize))
}

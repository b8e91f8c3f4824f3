//! GraphQL schema definition.

use chrono::{DateTime, Utc};
use juniper::{EmptySubscription, FieldError, FieldResult, RootNode, Value};
use tracing::error;
use uuid::Uuid;

use super::context::GraphQLContext;
use crate::common::{AccountId, ActorRole, PageArgs, RequestId};

use crate::domains::analytics::actions as analytics_actions;
use crate::domains::analytics::data::{
    campaign_type_counts, status_counts, ActorOverviewData, AnalyticsScopeInput,
    CampaignTypeCount, EngagementSummaryData, MonthlyTrendBucket, ProfileViewInput,
    RevenueSummaryData, StatusCount, TrendingSubjectData,
};
use crate::domains::collaboration::actions as collab_actions;
use crate::domains::collaboration::actions::SweepReport;
use crate::domains::collaboration::data::{
    CollaborationRequestData, CollaborationRequestPage, CounterOfferInput,
    CreateCollaborationRequestInput, UpdateCollaborationTermsInput,
};
use crate::domains::collaboration::models::CollaborationStatus;
use crate::domains::collaboration::store::{ListFilter, RequestScope};
use crate::domains::collaboration::CollaborationError;

const DEFAULT_TREND_MONTHS: i32 = 12;

/// Outcome of a manual expiry sweep
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct SweepReportData {
    pub scanned: i32,
    pub expired: i32,
    pub skipped: i32,
    pub failed: i32,
}

impl From<SweepReport> for SweepReportData {
    fn from(report: SweepReport) -> Self {
        let count = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
        Self {
            scanned: count(report.scanned),
            expired: count(report.expired),
            skipped: count(report.skipped),
            failed: count(report.failed),
        }
    }
}

/// Convert a domain error into a FieldError carrying `extensions.kind`.
fn to_field_error(e: CollaborationError) -> FieldError {
    if matches!(e, CollaborationError::Internal(_)) {
        error!(error = ?e, "Internal error in GraphQL resolver");
    }

    let mut extensions = juniper::Object::with_capacity(2);
    extensions.add_field("kind", Value::scalar(e.kind().to_string()));
    if let CollaborationError::DuplicateActiveRequest { existing_id } = &e {
        extensions.add_field("existingId", Value::scalar(existing_id.to_string()));
    }

    let message = match &e {
        CollaborationError::Internal(_) => "Internal server error".to_string(),
        other => other.to_string(),
    };

    FieldError::new(message, Value::object(extensions))
}

fn scope_of(scope: Option<AnalyticsScopeInput>) -> RequestScope {
    scope.map(RequestScope::from).unwrap_or_default()
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    // =========================================================================
    // Collaboration Queries
    // =========================================================================

    /// Get a single collaboration request (participants and admins)
    async fn collaboration_request(
        ctx: &GraphQLContext,
        id: Uuid,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let request = collab_actions::get_request(RequestId::from_uuid(id), actor, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(request.into())
    }

    /// Requests where the caller is the brand or the creator, newest first
    async fn my_collaboration_requests(
        ctx: &GraphQLContext,
        status: Option<CollaborationStatus>,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> FieldResult<CollaborationRequestPage> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let page = collab_actions::list_my_requests(
            actor,
            ListFilter { status },
            PageArgs { page, limit },
            ctx.deps(),
        )
        .await
        .map_err(to_field_error)?;
        Ok(page.into())
    }

    /// Every request on the platform (admin only)
    async fn all_collaboration_requests(
        ctx: &GraphQLContext,
        status: Option<CollaborationStatus>,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> FieldResult<CollaborationRequestPage> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let page = collab_actions::list_all_requests(
            actor,
            ListFilter { status },
            PageArgs { page, limit },
            ctx.deps(),
        )
        .await
        .map_err(to_field_error)?;
        Ok(page.into())
    }

    // =========================================================================
    // Analytics Queries
    // =========================================================================

    /// Request counts per status; every status is present
    async fn status_distribution(
        ctx: &GraphQLContext,
        scope: Option<AnalyticsScopeInput>,
    ) -> FieldResult<Vec<StatusCount>> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let distribution =
            analytics_actions::status_distribution(actor, scope_of(scope), ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(status_counts(&distribution))
    }

    async fn campaign_type_breakdown(
        ctx: &GraphQLContext,
        scope: Option<AnalyticsScopeInput>,
    ) -> FieldResult<Vec<CampaignTypeCount>> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let breakdown =
            analytics_actions::campaign_type_breakdown(actor, scope_of(scope), ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(campaign_type_counts(&breakdown))
    }

    /// Per-month totals, newest month first (default 12 months)
    async fn monthly_trend(
        ctx: &GraphQLContext,
        months: Option<i32>,
        scope: Option<AnalyticsScopeInput>,
    ) -> FieldResult<Vec<MonthlyTrendBucket>> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let buckets = analytics_actions::monthly_trend(
            actor,
            scope_of(scope),
            months.unwrap_or(DEFAULT_TREND_MONTHS),
            ctx.deps(),
        )
        .await
        .map_err(to_field_error)?;
        Ok(buckets.into_iter().map(MonthlyTrendBucket::from).collect())
    }

    async fn revenue_summary(
        ctx: &GraphQLContext,
        scope: Option<AnalyticsScopeInput>,
    ) -> FieldResult<RevenueSummaryData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let summary = analytics_actions::revenue_summary(actor, scope_of(scope), ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(summary.into())
    }

    /// Profile view totals; defaults to the caller's own profile
    async fn engagement_summary(
        ctx: &GraphQLContext,
        subject_id: Option<Uuid>,
    ) -> FieldResult<EngagementSummaryData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let subject = subject_id.map(AccountId::from_uuid).unwrap_or(actor.id);
        let summary = analytics_actions::engagement_summary(actor, subject, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(summary.into())
    }

    async fn actor_overview(
        ctx: &GraphQLContext,
        account_id: Option<Uuid>,
    ) -> FieldResult<ActorOverviewData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let overview = analytics_actions::actor_overview(
            actor,
            account_id.map(AccountId::from_uuid),
            ctx.deps(),
        )
        .await
        .map_err(to_field_error)?;
        Ok(overview.into())
    }

    /// Most viewed profiles of one role since a cut-off (default 30 days)
    async fn trending_subjects(
        ctx: &GraphQLContext,
        subject_type: ActorRole,
        since: Option<DateTime<Utc>>,
        limit: Option<i32>,
    ) -> FieldResult<Vec<TrendingSubjectData>> {
        ctx.require_actor().map_err(to_field_error)?;
        let subjects = analytics_actions::trending_subjects(subject_type, since, limit, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(subjects.into_iter().map(TrendingSubjectData::from).collect())
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    // =========================================================================
    // Lifecycle Mutations
    // =========================================================================

    /// Brand opens a collaboration request with a creator
    async fn create_collaboration_request(
        ctx: &GraphQLContext,
        input: CreateCollaborationRequestInput,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let creator_id = AccountId::from_uuid(input.creator_id);
        let terms = input.into_terms().map_err(to_field_error)?;
        let request = collab_actions::create_request(actor, creator_id, terms, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(request.into())
    }

    /// Brand edits the terms of a pending request
    async fn update_collaboration_terms(
        ctx: &GraphQLContext,
        id: Uuid,
        input: UpdateCollaborationTermsInput,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let update = input.into_update().map_err(to_field_error)?;
        let request =
            collab_actions::update_terms(RequestId::from_uuid(id), actor, update, ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(request.into())
    }

    /// Creator replies to a pending request, optionally with a counter-offer
    async fn respond_to_collaboration_request(
        ctx: &GraphQLContext,
        id: Uuid,
        message: String,
        counter_offer: Option<CounterOfferInput>,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let counter_offer = counter_offer
            .map(CounterOfferInput::into_counter_offer)
            .transpose()
            .map_err(to_field_error)?;
        let request = collab_actions::respond_to_request(
            RequestId::from_uuid(id),
            actor,
            &message,
            counter_offer,
            ctx.deps(),
        )
        .await
        .map_err(to_field_error)?;
        Ok(request.into())
    }

    /// Brand answers the creator's response
    async fn reply_to_collaboration_request(
        ctx: &GraphQLContext,
        id: Uuid,
        message: String,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let request =
            collab_actions::reply_to_request(RequestId::from_uuid(id), actor, &message, ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(request.into())
    }

    async fn accept_collaboration_request(
        ctx: &GraphQLContext,
        id: Uuid,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let request = collab_actions::accept_request(RequestId::from_uuid(id), actor, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(request.into())
    }

    async fn reject_collaboration_request(
        ctx: &GraphQLContext,
        id: Uuid,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let request = collab_actions::reject_request(RequestId::from_uuid(id), actor, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(request.into())
    }

    async fn cancel_collaboration_request(
        ctx: &GraphQLContext,
        id: Uuid,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let request = collab_actions::cancel_request(RequestId::from_uuid(id), actor, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(request.into())
    }

    async fn complete_collaboration_request(
        ctx: &GraphQLContext,
        id: Uuid,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let request =
            collab_actions::complete_request(RequestId::from_uuid(id), actor, ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(request.into())
    }

    // =========================================================================
    // Admin Mutations
    // =========================================================================

    /// Move a request along a legal edge regardless of ownership (admin only)
    async fn admin_set_collaboration_status(
        ctx: &GraphQLContext,
        id: Uuid,
        status: CollaborationStatus,
    ) -> FieldResult<CollaborationRequestData> {
        let actor = ctx.require_actor().map_err(to_field_error)?;
        let request =
            collab_actions::admin_set_status(RequestId::from_uuid(id), status, actor, ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(request.into())
    }

    /// Run the expiry sweep now (admin only)
    async fn sweep_expired_requests(ctx: &GraphQLContext) -> FieldResult<SweepReportData> {
        ctx.require_admin().map_err(to_field_error)?;
        let report = collab_actions::sweep_expired(Utc::now(), ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(report.into())
    }

    // =========================================================================
    // Analytics Mutations
    // =========================================================================

    /// Record a profile view; anonymous viewers are allowed.
    /// Returns false when the view was ignored (viewing one's own profile).
    async fn record_profile_view(
        ctx: &GraphQLContext,
        input: ProfileViewInput,
    ) -> FieldResult<bool> {
        let recorded = analytics_actions::record_view(
            ctx.actor(),
            AccountId::from_uuid(input.subject_id),
            input.interactions(),
            ctx.deps(),
        )
        .await
        .map_err(to_field_error)?;
        Ok(recorded.is_some())
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{ListFilter, RequestScope, RequestStore, StaleCursor, StoreError};
use crate::common::{AccountId, ActorRole, Page, RequestId, ValidatedPageArgs};
use crate::domains::collaboration::models::{
    Budget, BrandResponse, CampaignType, CollaborationRequest, CollaborationStatus,
    ContentRequirements, CreatorResponse, Negotiation, NewCollaborationRequest, RequestPatch,
    RequestTerms, Timeline,
};

/// Row shape of `collaboration_requests`.
#[derive(Debug, sqlx::FromRow)]
struct CollaborationRequestRow {
    id: RequestId,
    brand_id: AccountId,
    creator_id: AccountId,
    title: String,
    description: String,
    initial_message: String,
    campaign_type: CampaignType,
    budget_min: Decimal,
    budget_max: Decimal,
    currency: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_flexible: bool,
    content_requirements: Option<Json<ContentRequirements>>,
    status: CollaborationStatus,
    creator_response: Option<Json<CreatorResponse>>,
    brand_response: Option<Json<BrandResponse>>,
    is_urgent: bool,
    tags: Vec<String>,
    viewed_at: Option<DateTime<Utc>>,
    response_latency_secs: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CollaborationRequestRow> for CollaborationRequest {
    fn from(row: CollaborationRequestRow) -> Self {
        CollaborationRequest {
            id: row.id,
            brand_id: row.brand_id,
            creator_id: row.creator_id,
            terms: RequestTerms {
                title: row.title,
                description: row.description,
                initial_message: row.initial_message,
                campaign_type: row.campaign_type,
                budget: Budget {
                    min: row.budget_min,
                    max: row.budget_max,
                    currency: row.currency,
                },
                timeline: Timeline {
                    start_date: row.start_date,
                    end_date: row.end_date,
                    is_flexible: row.is_flexible,
                },
                content_requirements: row.content_requirements.map(|j| j.0),
                is_urgent: row.is_urgent,
                tags: row.tags,
            },
            status: row.status,
            negotiation: Negotiation {
                creator_response: row.creator_response.map(|j| j.0),
                brand_response: row.brand_response.map(|j| j.0),
            },
            viewed_at: row.viewed_at,
            response_latency_secs: row.response_latency_secs,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres-backed store. The duplicate guard is the partial unique index
/// `collaboration_requests_one_active_per_pair`.
#[derive(Clone)]
pub struct PostgresRequestStore {
    pool: PgPool,
}

impl PostgresRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_status(&self, id: RequestId) -> Result<CollaborationStatus, StoreError> {
        sqlx::query_scalar::<_, CollaborationStatus>(
            "SELECT status FROM collaboration_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl RequestStore for PostgresRequestStore {
    async fn create(
        &self,
        new: NewCollaborationRequest,
    ) -> Result<CollaborationRequest, StoreError> {
        let terms = new.terms;
        let inserted = sqlx::query_as::<_, CollaborationRequestRow>(
            r#"
            INSERT INTO collaboration_requests (
                id, brand_id, creator_id, title, description, initial_message,
                campaign_type, budget_min, budget_max, currency,
                start_date, end_date, is_flexible, content_requirements,
                is_urgent, tags, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, 'pending')
            ON CONFLICT (brand_id, creator_id) WHERE status IN ('pending', 'accepted')
            DO NOTHING
            RETURNING *
            "#,
        )
        .bind(RequestId::new())
        .bind(new.brand_id)
        .bind(new.creator_id)
        .bind(&terms.title)
        .bind(&terms.description)
        .bind(&terms.initial_message)
        .bind(terms.campaign_type)
        .bind(terms.budget.min)
        .bind(terms.budget.max)
        .bind(&terms.budget.currency)
        .bind(terms.timeline.start_date)
        .bind(terms.timeline.end_date)
        .bind(terms.timeline.is_flexible)
        .bind(terms.content_requirements.map(Json))
        .bind(terms.is_urgent)
        .bind(&terms.tags)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(row) => Ok(row.into()),
            None => match self.find_active(new.brand_id, new.creator_id).await? {
                Some(existing) => Err(StoreError::DuplicateActive {
                    existing_id: existing.id,
                }),
                // The blocking request left the active set between our
                // insert and this lookup.
                None => Err(StoreError::Conflict(
                    "active request for this pair changed during creation".to_string(),
                )),
            },
        }
    }

    async fn get(&self, id: RequestId) -> Result<CollaborationRequest, StoreError> {
        sqlx::query_as::<_, CollaborationRequestRow>(
            "SELECT * FROM collaboration_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Into::into)
        .ok_or(StoreError::NotFound)
    }

    async fn find_active(
        &self,
        brand_id: AccountId,
        creator_id: AccountId,
    ) -> Result<Option<CollaborationRequest>, StoreError> {
        let row = sqlx::query_as::<_, CollaborationRequestRow>(
            r#"
            SELECT * FROM collaboration_requests
            WHERE brand_id = $1 AND creator_id = $2 AND status IN ('pending', 'accepted')
            "#,
        )
        .bind(brand_id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_by_actor(
        &self,
        actor_id: AccountId,
        role: ActorRole,
        filter: &ListFilter,
        page: &ValidatedPageArgs,
    ) -> Result<Page<CollaborationRequest>, StoreError> {
        let (brand_id, creator_id) = match role {
            ActorRole::Brand => (Some(actor_id), None),
            ActorRole::Creator => (None, Some(actor_id)),
            ActorRole::Admin => (None, None),
        };

        let rows = sqlx::query_as::<_, CollaborationRequestRow>(
            r#"
            SELECT * FROM collaboration_requests
            WHERE ($1::uuid IS NULL OR brand_id = $1)
              AND ($2::uuid IS NULL OR creator_id = $2)
              AND ($3::collaboration_status IS NULL OR status = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(brand_id)
        .bind(creator_id)
        .bind(filter.status)
        .bind(page.sql_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM collaboration_requests
            WHERE ($1::uuid IS NULL OR brand_id = $1)
              AND ($2::uuid IS NULL OR creator_id = $2)
              AND ($3::collaboration_status IS NULL OR status = $3)
            "#,
        )
        .bind(brand_id)
        .bind(creator_id)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }

    async fn update_status(
        &self,
        id: RequestId,
        expected: CollaborationStatus,
        next: CollaborationStatus,
        patch: RequestPatch,
    ) -> Result<CollaborationRequest, StoreError> {
        let terms = patch.terms;
        let updated = sqlx::query_as::<_, CollaborationRequestRow>(
            r#"
            UPDATE collaboration_requests SET
                status = $3,
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                initial_message = COALESCE($6, initial_message),
                campaign_type = COALESCE($7, campaign_type),
                budget_min = COALESCE($8, budget_min),
                budget_max = COALESCE($9, budget_max),
                currency = COALESCE($10, currency),
                start_date = COALESCE($11, start_date),
                end_date = COALESCE($12, end_date),
                is_flexible = COALESCE($13, is_flexible),
                content_requirements = COALESCE($14, content_requirements),
                is_urgent = COALESCE($15, is_urgent),
                tags = COALESCE($16, tags),
                creator_response = COALESCE($17, creator_response),
                brand_response = COALESCE($18, brand_response),
                response_latency_secs = COALESCE(response_latency_secs, $19),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .bind(terms.as_ref().map(|t| t.title.clone()))
        .bind(terms.as_ref().map(|t| t.description.clone()))
        .bind(terms.as_ref().map(|t| t.initial_message.clone()))
        .bind(terms.as_ref().map(|t| t.campaign_type))
        .bind(terms.as_ref().map(|t| t.budget.min))
        .bind(terms.as_ref().map(|t| t.budget.max))
        .bind(terms.as_ref().map(|t| t.budget.currency.clone()))
        .bind(terms.as_ref().map(|t| t.timeline.start_date))
        .bind(terms.as_ref().map(|t| t.timeline.end_date))
        .bind(terms.as_ref().map(|t| t.timeline.is_flexible))
        .bind(
            terms
                .as_ref()
                .and_then(|t| t.content_requirements.clone())
                .map(Json),
        )
        .bind(terms.as_ref().map(|t| t.is_urgent))
        .bind(terms.as_ref().map(|t| t.tags.clone()))
        .bind(patch.creator_response.map(Json))
        .bind(patch.brand_response.map(Json))
        .bind(patch.response_latency_secs)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => Ok(row.into()),
            None => Err(StoreError::StatusMismatch {
                actual: self.current_status(id).await?,
            }),
        }
    }

    async fn mark_viewed(
        &self,
        id: RequestId,
        at: DateTime<Utc>,
    ) -> Result<CollaborationRequest, StoreError> {
        sqlx::query_as::<_, CollaborationRequestRow>(
            r#"
            UPDATE collaboration_requests
            SET viewed_at = COALESCE(viewed_at, $2)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?
        .map(Into::into)
        .ok_or(StoreError::NotFound)
    }

    async fn find_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
        after: Option<StaleCursor>,
        limit: i64,
    ) -> Result<Vec<CollaborationRequest>, StoreError> {
        let rows = sqlx::query_as::<_, CollaborationRequestRow>(
            r#"
            SELECT * FROM collaboration_requests
            WHERE status = 'pending' AND updated_at < $1
              AND ($2::timestamptz IS NULL OR (updated_at, id) > ($2, $3))
            ORDER BY updated_at ASC, id ASC
            LIMIT $4
            "#,
        )
        .bind(cutoff)
        .bind(after.map(|c| c.updated_at))
        .bind(after.map(|c| c.id))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn scan(&self, scope: &RequestScope) -> Result<Vec<CollaborationRequest>, StoreError> {
        let rows = sqlx::query_as::<_, CollaborationRequestRow>(
            r#"
            SELECT * FROM collaboration_requests
            WHERE ($1::uuid IS NULL OR brand_id = $1)
              AND ($2::uuid IS NULL OR creator_id = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at < $4)
              AND ($5::campaign_type IS NULL OR campaign_type = $5)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(scope.brand_id)
        .bind(scope.creator_id)
        .bind(scope.created_from)
        .bind(scope.created_to)
        .bind(scope.campaign_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::ViewEventLog;
use crate::common::{AccountId, ActorRole, ViewEventId};
use crate::domains::analytics::models::{InteractionFlags, NewViewEvent, ViewEvent};
use crate::domains::collaboration::store::StoreError;

#[derive(Debug, sqlx::FromRow)]
struct ViewEventRow {
    id: ViewEventId,
    subject_id: AccountId,
    subject_type: ActorRole,
    viewer_id: Option<AccountId>,
    viewer_type: Option<ActorRole>,
    profile_clicked: bool,
    contact_clicked: bool,
    portfolio_viewed: bool,
    collaboration_requested: bool,
    occurred_at: DateTime<Utc>,
}

impl From<ViewEventRow> for ViewEvent {
    fn from(row: ViewEventRow) -> Self {
        ViewEvent {
            id: row.id,
            subject_id: row.subject_id,
            subject_type: row.subject_type,
            viewer_id: row.viewer_id,
            viewer_type: row.viewer_type,
            interactions: InteractionFlags {
                profile_clicked: row.profile_clicked,
                contact_clicked: row.contact_clicked,
                portfolio_viewed: row.portfolio_viewed,
                collaboration_requested: row.collaboration_requested,
            },
            occurred_at: row.occurred_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresViewEventLog {
    pool: PgPool,
}

impl PostgresViewEventLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViewEventLog for PostgresViewEventLog {
    async fn append(&self, event: NewViewEvent) -> Result<ViewEvent, StoreError> {
        let row = sqlx::query_as::<_, ViewEventRow>(
            r#"
            INSERT INTO view_events (
                id, subject_id, subject_type, viewer_id, viewer_type,
                profile_clicked, contact_clicked, portfolio_viewed, collaboration_requested,
                occurred_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(ViewEventId::new())
        .bind(event.subject_id)
        .bind(event.subject_type)
        .bind(event.viewer_id)
        .bind(event.viewer_type)
        .bind(event.interactions.profile_clicked)
        .bind(event.interactions.contact_clicked)
        .bind(event.interactions.portfolio_viewed)
        .bind(event.interactions.collaboration_requested)
        .bind(event.occurred_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn for_subject(&self, subject_id: AccountId) -> Result<Vec<ViewEvent>, StoreError> {
        let rows = sqlx::query_as::<_, ViewEventRow>(
            "SELECT * FROM view_events WHERE subject_id = $1 ORDER BY occurred_at ASC",
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn since(
        &self,
        subject_type: ActorRole,
        since: DateTime<Utc>,
    ) -> Result<Vec<ViewEvent>, StoreError> {
        let rows = sqlx::query_as::<_, ViewEventRow>(
            "SELECT * FROM view_events WHERE subject_type = $1 AND occurred_at >= $2",
        )
        .bind(subject_type)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

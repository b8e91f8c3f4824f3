//! Postgres projection of the identity system's accounts.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::{ActorRecord, BaseActorDirectory};
use crate::common::AccountId;

pub struct PostgresActorDirectory {
    pool: PgPool,
}

impl PostgresActorDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseActorDirectory for PostgresActorDirectory {
    async fn resolve(&self, account_id: AccountId) -> Result<Option<ActorRecord>> {
        sqlx::query_as::<_, ActorRecord>("SELECT id, role, is_active FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to resolve account {}", account_id))
    }
}

//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. Stores and external collaborators sit behind trait objects so
//! tests can swap in in-memory and mock implementations.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::{LifecyclePolicy, RetryPolicy};
use crate::domains::analytics::store::{PostgresViewEventLog, ViewEventLog};
use crate::domains::auth::JwtService;
use crate::domains::collaboration::store::{PostgresRequestStore, RequestStore};
use crate::kernel::{
    directory::PostgresActorDirectory, notifier::StreamHubNotifier, stream_hub::StreamHub,
    BaseActorDirectory, BaseNotifier,
};

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    pub requests: Arc<dyn RequestStore>,
    pub view_events: Arc<dyn ViewEventLog>,
    pub directory: Arc<dyn BaseActorDirectory>,
    pub notifier: Arc<dyn BaseNotifier>,
    /// JWT service for token verification and creation
    pub jwt_service: Arc<JwtService>,
    /// In-process pub/sub hub for real-time streaming to SSE endpoints
    pub stream_hub: StreamHub,
    pub lifecycle: LifecyclePolicy,
    pub retry: RetryPolicy,
}

impl ServerDeps {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        requests: Arc<dyn RequestStore>,
        view_events: Arc<dyn ViewEventLog>,
        directory: Arc<dyn BaseActorDirectory>,
        notifier: Arc<dyn BaseNotifier>,
        jwt_service: Arc<JwtService>,
        stream_hub: StreamHub,
        lifecycle: LifecyclePolicy,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            requests,
            view_events,
            directory,
            notifier,
            jwt_service,
            stream_hub,
            lifecycle,
            retry,
        }
    }

    /// Production wiring: Postgres stores and directory, stream hub notifier.
    pub fn postgres(
        pool: PgPool,
        jwt_service: Arc<JwtService>,
        lifecycle: LifecyclePolicy,
        retry: RetryPolicy,
    ) -> Self {
        let stream_hub = StreamHub::new();
        Self::new(
            Arc::new(PostgresRequestStore::new(pool.clone())),
            Arc::new(PostgresViewEventLog::new(pool.clone())),
            Arc::new(PostgresActorDirectory::new(pool)),
            Arc::new(StreamHubNotifier::new(stream_hub.clone())),
            jwt_service,
            stream_hub,
            lifecycle,
            retry,
        )
    }
}

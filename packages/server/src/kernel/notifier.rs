//! Notification delivery.
//!
//! Events go out after the store write commits. Delivery is best-effort: a
//! slow or failing notifier is logged and otherwise ignored.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use super::stream_hub::{actor_topic, StreamHub};
use super::{BaseNotifier, ServerDeps};
use crate::domains::collaboration::events::CollaborationEvent;

/// Publishes events to both parties' `actor:{id}` stream topics.
pub struct StreamHubNotifier {
    hub: StreamHub,
}

impl StreamHubNotifier {
    pub fn new(hub: StreamHub) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl BaseNotifier for StreamHubNotifier {
    async fn notify(&self, event: &CollaborationEvent) -> Result<()> {
        let payload = serde_json::to_value(event).context("Failed to serialize event")?;
        let request = event.request();
        for account in [request.brand_id, request.creator_id] {
            self.hub.publish(&actor_topic(account), payload.clone()).await;
        }
        Ok(())
    }
}

/// Send an event through the configured notifier, bounded by the lifecycle
/// notification timeout. Never fails.
pub async fn dispatch(deps: &ServerDeps, event: CollaborationEvent) {
    let timeout = Duration::from_millis(deps.lifecycle.notify_timeout_ms);
    let request_id = event.request().request_id;

    match tokio::time::timeout(timeout, deps.notifier.notify(&event)).await {
        Ok(Ok(())) => debug!(event = event.name(), request_id = %request_id, "Notification sent"),
        Ok(Err(e)) => warn!(
            event = event.name(),
            request_id = %request_id,
            error = %e,
            "Notification delivery failed"
        ),
        Err(_) => warn!(
            event = event.name(),
            request_id = %request_id,
            timeout_ms = deps.lifecycle.notify_timeout_ms,
            "Notification delivery timed out"
        ),
    }
}

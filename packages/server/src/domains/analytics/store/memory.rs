use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::ViewEventLog;
use crate::common::{AccountId, ActorRole, ViewEventId};
use crate::domains::analytics::models::{NewViewEvent, ViewEvent};
use crate::domains::collaboration::store::StoreError;

#[derive(Default)]
pub struct InMemoryViewEventLog {
    events: Mutex<Vec<ViewEvent>>,
}

impl InMemoryViewEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewEventLog for InMemoryViewEventLog {
    async fn append(&self, event: NewViewEvent) -> Result<ViewEvent, StoreError> {
        let event = ViewEvent {
            id: ViewEventId::new(),
            subject_id: event.subject_id,
            subject_type: event.subject_type,
            viewer_id: event.viewer_id,
            viewer_type: event.viewer_type,
            interactions: event.interactions,
            occurred_at: event.occurred_at,
        };
        self.events.lock().await.push(event.clone());
        Ok(event)
    }

    async fn for_subject(&self, subject_id: AccountId) -> Result<Vec<ViewEvent>, StoreError> {
        let mut events: Vec<ViewEvent> = self
            .events
            .lock()
            .await
            .iter()
            .filter(|e| e.subject_id == subject_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.occurred_at);
        Ok(events)
    }

    async fn since(
        &self,
        subject_type: ActorRole,
        since: DateTime<Utc>,
    ) -> Result<Vec<ViewEvent>, StoreError> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .filter(|e| e.subject_type == subject_type && e.occurred_at >= since)
            .cloned()
            .collect())
    }
}

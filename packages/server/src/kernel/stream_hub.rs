//! In-process pub/sub hub for real-time streaming.
//!
//! Topic-keyed broadcast channels feed the SSE endpoint. Topics are opaque
//! strings; collaboration notifications use `actor:{account_id}`.
//!
//! # Usage
//!
//! Producers (notifier):
//!   hub.publish(&actor_topic(brand_id), json!({"type": "request_accepted"})).await;
//!
//! Consumers (SSE endpoints):
//!   let rx = hub.subscribe(&actor_topic(account_id)).await;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::common::AccountId;

/// Topic carrying every notification addressed to an account.
pub fn actor_topic(account_id: AccountId) -> String {
    format!("actor:{}", account_id)
}

/// Thread-safe, cloneable hub keyed by string topics.
/// Payloads are `serde_json::Value`; domains serialize their own types.
#[derive(Clone)]
pub struct StreamHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<serde_json::Value>>>>,
    capacity: usize,
}

impl StreamHub {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish to a topic. Returns how many subscribers received it.
    pub async fn publish(&self, topic: &str, value: serde_json::Value) -> usize {
        let channels = self.channels.read().await;
        match channels.get(topic) {
            Some(tx) => tx.send(value).unwrap_or(0),
            None => 0,
        }
    }

    /// Subscribe to a topic, creating its channel on first use.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<serde_json::Value> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Drop channels nobody listens to. Returns how many were removed.
    pub async fn cleanup(&self) -> usize {
        let mut channels = self.channels.write().await;
        let before = channels.len();
        channels.retain(|_, tx| tx.receiver_count() > 0);
        before - channels.len()
    }
}

impl Default for StreamHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_value() {
        let hub = StreamHub::new();
        let account = AccountId::new();
        let mut rx = hub.subscribe(&actor_topic(account)).await;

        let value = serde_json::json!({"type": "request_created"});
        assert_eq!(hub.publish(&actor_topic(account), value.clone()).await, 1);
        assert_eq!(rx.recv().await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_reaches_nobody() {
        let hub = StreamHub::new();
        let delivered = hub
            .publish("actor:nobody", serde_json::json!({"type": "dropped"}))
            .await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_cleanup_removes_abandoned_topics() {
        let hub = StreamHub::new();
        let rx = hub.subscribe("actor:ephemeral").await;
        assert_eq!(hub.channels.read().await.len(), 1);

        drop(rx);
        assert_eq!(hub.cleanup().await, 1);
        assert!(hub.channels.read().await.is_empty());
    }
}

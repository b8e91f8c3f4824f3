//! SSE streaming endpoint.
//!
//! GET /api/streams/:topic?token=JWT
//!
//! Subscribes to StreamHub by topic string and forwards JSON values as SSE events.
//! EventSource can't send custom headers, so the JWT may be passed as a `?token=`
//! query param; the Authorization header is accepted as a fallback.

use std::convert::Infallible;

use axum::{
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;

use crate::common::{AccountId, Actor};
use crate::server::app::AxumAppState;

#[derive(Deserialize)]
pub struct StreamQuery {
    /// JWT token for authentication
    token: Option<String>,
}

/// SSE stream handler.
///
/// Only `actor:{account_id}` topics exist. Callers may follow their own topic;
/// admins may follow any actor.
pub async fn stream_handler(
    Extension(state): Extension<AxumAppState>,
    Path(topic): Path<String>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Result<Sse<impl futures::Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let token = query
        .token
        .or_else(|| extract_bearer_token(&headers))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = state
        .jwt_service
        .verify_token(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    authorize_topic(&topic, &claims.actor()).map_err(|e| {
        tracing::debug!(topic = %topic, error = %e, "Stream subscription refused");
        StatusCode::FORBIDDEN
    })?;

    let rx = state.stream_hub.subscribe(&topic).await;

    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async {
        match result {
            Ok(value) => {
                let event_name = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("message");
                Event::default()
                    .event(event_name)
                    .json_data(&value)
                    .ok()
                    .map(Ok)
            }
            Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
                Event::default()
                    .event("lagged")
                    .json_data(&serde_json::json!({"missed": n}))
                    .ok()
                    .map(Ok)
            }
        }
    });

    Ok(Sse::new(connected.chain(events)).keep_alive(KeepAlive::default()))
}

/// Extract Bearer token from Authorization header.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get("authorization")?.to_str().ok()?;
    auth.strip_prefix("Bearer ").map(|t| t.to_string())
}

/// Topic-level authorization.
fn authorize_topic(topic: &str, actor: &Actor) -> Result<(), anyhow::Error> {
    let Some(raw_id) = topic.strip_prefix("actor:") else {
        anyhow::bail!("Unknown topic prefix: {}", topic);
    };
    let account_id = AccountId::parse(raw_id)?;

    if actor.is_admin() || actor.id == account_id {
        Ok(())
    } else {
        anyhow::bail!("Actors may only follow their own notifications")
    }
}

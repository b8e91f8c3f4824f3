//! Collaboration domain events - FACTS ONLY
//!
//! Emitted after the store write that produced them has committed. Consumers
//! (notifiers, streams) must treat delivery as best-effort.

use serde::{Deserialize, Serialize};

use super::models::CollaborationRequest;
use crate::common::{AccountId, ActorRole, RequestId};

/// Identifies the request an event is about and both parties to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRef {
    pub request_id: RequestId,
    pub brand_id: AccountId,
    pub creator_id: AccountId,
}

impl From<&CollaborationRequest> for RequestRef {
    fn from(request: &CollaborationRequest) -> Self {
        Self {
            request_id: request.id,
            brand_id: request.brand_id,
            creator_id: request.creator_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollaborationEvent {
    RequestCreated {
        #[serde(flatten)]
        request: RequestRef,
    },
    RequestAccepted {
        #[serde(flatten)]
        request: RequestRef,
    },
    RequestRejected {
        #[serde(flatten)]
        request: RequestRef,
    },
    RequestCancelled {
        #[serde(flatten)]
        request: RequestRef,
        cancelled_by: AccountId,
    },
    RequestCompleted {
        #[serde(flatten)]
        request: RequestRef,
        completed_by: AccountId,
    },
    RequestExpired {
        #[serde(flatten)]
        request: RequestRef,
    },
    ResponseReceived {
        #[serde(flatten)]
        request: RequestRef,
        from: ActorRole,
    },
    TermsUpdated {
        #[serde(flatten)]
        request: RequestRef,
    },
}

impl CollaborationEvent {
    pub fn request(&self) -> &RequestRef {
        match self {
            CollaborationEvent::RequestCreated { request }
            | CollaborationEvent::RequestAccepted { request }
            | CollaborationEvent::RequestRejected { request }
            | CollaborationEvent::RequestCancelled { request, .. }
            | CollaborationEvent::RequestCompleted { request, .. }
            | CollaborationEvent::RequestExpired { request }
            | CollaborationEvent::ResponseReceived { request, .. }
            | CollaborationEvent::TermsUpdated { request } => request,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CollaborationEvent::RequestCreated { .. } => "request_created",
            CollaborationEvent::RequestAccepted { .. } => "request_accepted",
            CollaborationEvent::RequestRejected { .. } => "request_rejected",
            CollaborationEvent::RequestCancelled { .. } => "request_cancelled",
            CollaborationEvent::RequestCompleted { .. } => "request_completed",
            CollaborationEvent::RequestExpired { .. } => "request_expired",
            CollaborationEvent::ResponseReceived { .. } => "response_received",
            CollaborationEvent::TermsUpdated { .. } => "terms_updated",
        }
    }
}

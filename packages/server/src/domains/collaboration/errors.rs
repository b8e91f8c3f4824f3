use thiserror::Error;

use super::models::CollaborationStatus;
use super::store::StoreError;
use crate::common::{AuthError, PaginationError, RequestId};

/// Failure taxonomy of the collaboration engine.
///
/// Every variant is a normal, expected outcome except `Unavailable` and
/// `Internal`. Clients branch on [`CollaborationError::kind`].
#[derive(Error, Debug)]
pub enum CollaborationError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot {attempted} a request that is {from}")]
    InvalidTransition {
        from: CollaborationStatus,
        attempted: String,
    },

    #[error("An active collaboration request already exists: {existing_id}")]
    DuplicateActiveRequest { existing_id: RequestId },

    #[error("Conflicting update: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CollaborationError {
    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            CollaborationError::Validation(_) => "VALIDATION_ERROR",
            CollaborationError::Forbidden(_) => "FORBIDDEN",
            CollaborationError::NotFound(_) => "NOT_FOUND",
            CollaborationError::InvalidTransition { .. } => "INVALID_TRANSITION",
            CollaborationError::DuplicateActiveRequest { .. } => "DUPLICATE_ACTIVE_REQUEST",
            CollaborationError::Conflict(_) => "CONFLICT",
            CollaborationError::Unavailable(_) => "UNAVAILABLE",
            CollaborationError::Internal(_) => "INTERNAL",
        }
    }

    pub fn invalid_transition(from: CollaborationStatus, attempted: impl Into<String>) -> Self {
        CollaborationError::InvalidTransition {
            from,
            attempted: attempted.into(),
        }
    }

    /// Map a store failure on a specific request into the taxonomy.
    pub fn from_store(err: StoreError, id: RequestId, attempted: &str) -> Self {
        match err {
            StoreError::NotFound => {
                CollaborationError::NotFound(format!("collaboration request {}", id))
            }
            StoreError::StatusMismatch { actual } => {
                CollaborationError::invalid_transition(actual, attempted)
            }
            other => other.into(),
        }
    }
}

impl From<StoreError> for CollaborationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => CollaborationError::NotFound("record".to_string()),
            StoreError::StatusMismatch { actual } => CollaborationError::Conflict(format!(
                "stored status changed to {}",
                actual
            )),
            StoreError::DuplicateActive { existing_id } => {
                CollaborationError::DuplicateActiveRequest { existing_id }
            }
            StoreError::Conflict(msg) => CollaborationError::Conflict(msg),
            StoreError::Unavailable(msg) => CollaborationError::Unavailable(msg),
            StoreError::Database(e) => CollaborationError::Internal(e.into()),
        }
    }
}

impl From<PaginationError> for CollaborationError {
    fn from(err: PaginationError) -> Self {
        CollaborationError::Validation(err.to_string())
    }
}

impl From<AuthError> for CollaborationError {
    fn from(err: AuthError) -> Self {
        CollaborationError::Forbidden(err.to_string())
    }
}

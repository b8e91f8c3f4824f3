use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a collaboration request.
///
/// ```text
/// pending ──> accepted ──> completed
///    │           └──────> cancelled
///    ├──> rejected
///    ├──> cancelled
///    └──> expired
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
    juniper::GraphQLEnum,
)]
#[sqlx(type_name = "collaboration_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
    Completed,
    Cancelled,
}

impl CollaborationStatus {
    pub const ALL: [CollaborationStatus; 6] = [
        CollaborationStatus::Pending,
        CollaborationStatus::Accepted,
        CollaborationStatus::Rejected,
        CollaborationStatus::Expired,
        CollaborationStatus::Completed,
        CollaborationStatus::Cancelled,
    ];

    /// Pending and accepted requests hold the (brand, creator) slot.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            CollaborationStatus::Pending | CollaborationStatus::Accepted
        )
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Edges of the lifecycle graph. Nothing leaves a terminal status.
    pub fn can_transition_to(&self, next: CollaborationStatus) -> bool {
        use CollaborationStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Pending, Expired)
                | (Accepted, Completed)
                | (Accepted, Cancelled)
        )
    }
}

impl fmt::Display for CollaborationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CollaborationStatus::Pending => "pending",
            CollaborationStatus::Accepted => "accepted",
            CollaborationStatus::Rejected => "rejected",
            CollaborationStatus::Expired => "expired",
            CollaborationStatus::Completed => "completed",
            CollaborationStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for CollaborationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CollaborationStatus::Pending),
            "accepted" => Ok(CollaborationStatus::Accepted),
            "rejected" => Ok(CollaborationStatus::Rejected),
            "expired" => Ok(CollaborationStatus::Expired),
            "completed" => Ok(CollaborationStatus::Completed),
            "cancelled" => Ok(CollaborationStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid collaboration status: {}", s)),
        }
    }
}

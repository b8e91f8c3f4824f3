use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{AccountId, ActorRole, ViewEventId};

/// What the viewer did beyond loading the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionFlags {
    pub profile_clicked: bool,
    pub contact_clicked: bool,
    pub portfolio_viewed: bool,
    pub collaboration_requested: bool,
}

/// One profile view. The log is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEvent {
    pub id: ViewEventId,
    pub subject_id: AccountId,
    pub subject_type: ActorRole,
    /// `None` for anonymous visitors.
    pub viewer_id: Option<AccountId>,
    pub viewer_type: Option<ActorRole>,
    pub interactions: InteractionFlags,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewViewEvent {
    pub subject_id: AccountId,
    pub subject_type: ActorRole,
    pub viewer_id: Option<AccountId>,
    pub viewer_type: Option<ActorRole>,
    pub interactions: InteractionFlags,
    pub occurred_at: DateTime<Utc>,
}

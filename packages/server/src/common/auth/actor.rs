use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::AuthError;
use crate::common::entity_ids::AccountId;

/// Role an account plays on the platform.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    juniper::GraphQLEnum,
)]
#[sqlx(type_name = "account_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Brand,
    Creator,
    Admin,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Brand => write!(f, "brand"),
            ActorRole::Creator => write!(f, "creator"),
            ActorRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for ActorRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brand" => Ok(ActorRole::Brand),
            "creator" => Ok(ActorRole::Creator),
            "admin" => Ok(ActorRole::Admin),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated caller of an engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: AccountId,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: AccountId, role: ActorRole) -> Self {
        Self { id, role }
    }

    pub fn brand(id: AccountId) -> Self {
        Self::new(id, ActorRole::Brand)
    }

    pub fn creator(id: AccountId) -> Self {
        Self::new(id, ActorRole::Creator)
    }

    pub fn admin(id: AccountId) -> Self {
        Self::new(id, ActorRole::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ActorRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::AdminRequired)
        }
    }
}

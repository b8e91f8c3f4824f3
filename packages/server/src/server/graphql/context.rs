use std::sync::Arc;

use crate::common::Actor;
use crate::domains::collaboration::CollaborationError;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GraphQL request context
///
/// Shared dependencies plus the caller resolved by the JWT middleware.
#[derive(Clone)]
pub struct GraphQLContext {
    pub server_deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(server_deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self {
            server_deps,
            auth_user,
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.server_deps
    }

    /// The authenticated caller, if any.
    pub fn actor(&self) -> Option<&Actor> {
        self.auth_user.as_ref().map(|user| &user.actor)
    }

    /// Require authentication
    pub fn require_actor(&self) -> Result<&Actor, CollaborationError> {
        self.actor()
            .ok_or_else(|| CollaborationError::Forbidden("Authentication required".to_string()))
    }

    /// Require admin access
    pub fn require_admin(&self) -> Result<&Actor, CollaborationError> {
        let actor = self.require_actor()?;
        actor.require_admin()?;
        Ok(actor)
    }
}

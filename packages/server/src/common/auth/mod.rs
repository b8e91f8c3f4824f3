//! Caller identity.
//!
//! Every engine operation receives an already-authenticated [`Actor`]. How the
//! actor was established (JWT, CLI, test harness) is not this module's concern;
//! ownership and role checks happen in the domain actions.

mod actor;
mod errors;

pub use actor::{Actor, ActorRole};
pub use errors::AuthError;

//! Collaboration lifecycle actions
//!
//! Actions take an authenticated `Actor` and return plain data or a
//! `CollaborationError`. GraphQL resolvers call them directly.

pub mod create_request;
mod lifecycle;
pub mod negotiation;
pub mod queries;
pub mod sweep;
pub mod transitions;

pub use create_request::create_request;
pub use negotiation::{reply_to_request, respond_to_request, update_terms};
pub use queries::{get_request, list_all_requests, list_my_requests};
pub use sweep::{sweep_expired, SweepReport};
pub use transitions::{
    accept_request, admin_set_status, cancel_request, complete_request, reject_request,
};

//! Collaboration domain - the brand/creator request lifecycle.
//!
//! A brand proposes a paid collaboration to a creator; the creator responds,
//! accepts or rejects; accepted work is completed or cancelled; untouched
//! offers expire. All cross-call coordination happens in the store through
//! compare-and-swap status updates.

pub mod actions;
pub mod data;
pub mod errors;
pub mod events;
pub mod models;
pub mod store;

pub use errors::CollaborationError;
pub use events::CollaborationEvent;
pub use models::*;
pub use store::{
    InMemoryRequestStore, PostgresRequestStore, RequestStore, StaleCursor, StoreError,
};

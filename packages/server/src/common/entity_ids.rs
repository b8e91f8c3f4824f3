//! Typed ID definitions for the entities this service persists.
//!
//! Brands, creators and admins all live in the `accounts` table, so a single
//! `AccountId` identifies any participant regardless of role.

pub use super::id::Id;

/// Marker type for accounts (brands, creators, admins).
pub struct Account;

/// Marker type for collaboration requests.
pub struct Collaboration;

/// Marker type for profile view events.
pub struct ProfileView;

pub type AccountId = Id<Account>;
pub type RequestId = Id<Collaboration>;
pub type ViewEventId = Id<ProfileView>;

//! Auth domain - token verification for callers identified upstream.
//!
//! Accounts and credentials are owned by the identity system; this service
//! only verifies the HS256 tokens it issues and turns their claims into an
//! [`Actor`](crate::common::Actor).

pub mod jwt;

pub use jwt::{Claims, JwtService};

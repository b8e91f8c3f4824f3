// Collaboration Platform - API Core
//
// Backend for brand/creator collaboration requests: the request lifecycle,
// negotiation between the two parties and the engagement analytics derived
// from them. Domain actions live in domains/*/actions and take `&ServerDeps`.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;

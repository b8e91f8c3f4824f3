use thiserror::Error;

/// Authentication errors raised before a request reaches the engine.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

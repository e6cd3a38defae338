//! Authentication error types.

use thiserror::Error;

use super::token::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] incubator_core::EmailError),

    /// Invalid credentials (wrong password or account not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// An admin with this email already exists.
    #[error("an admin with this email already exists")]
    AdminAlreadyExists,

    /// A startup with this email already exists.
    #[error("a startup with this email already exists")]
    StartupAlreadyExists,

    /// Startup has not been approved yet.
    #[error("your application is pending approval")]
    ApprovalPending,

    /// Startup application was rejected.
    #[error("your application has been rejected")]
    ApplicationRejected,

    /// Token could not be issued.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

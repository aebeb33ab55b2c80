//! Domain service for authentication and the owner account.
//!
//! Handles credential checks, password changes and the display name shown
//! in the page header.

use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username and wrong password are deliberately not told apart.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Checks a username/password pair against the owner account.
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError>;

    /// Verifies credentials and returns the account to bind to the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Resolves a session's user id. `None` means the caller is anonymous.
    async fn load_user(&self, user_id: i32) -> Result<Option<User>, AuthError>;

    /// The account whose watchlist is being shown.
    async fn owner(&self) -> Result<Option<User>, AuthError>;

    /// Replaces a user's password hash.
    async fn set_password(&self, user_id: i32, new_password: &str) -> Result<(), AuthError>;

    /// Changes the display name.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserNotFound`] if the account no longer exists.
    async fn update_name(&self, user_id: i32, name: &str) -> Result<(), AuthError>;
}

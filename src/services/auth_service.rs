//! Domain service for registration and login.
//!
//! Sessions live in the web layer; this service only answers "who is this"
//! and "may this account be created".

use thiserror::Error;

use crate::db::User;
use crate::domain::UserId;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("This username already exists")]
    UsernameTaken,

    /// Every rule the submitted form broke, in display order.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

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

/// Submitted registration form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the username is unknown or
    /// the password does not match.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Validates the form and creates the account.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] listing every broken rule
    /// - [`AuthError::UsernameTaken`] if the name exists (also when another
    ///   registration wins a race for it)
    async fn register(&self, registration: &Registration) -> Result<User, AuthError>;

    /// Whether an account with exactly this username exists.
    async fn username_exists(&self, username: &str) -> Result<bool, AuthError>;

    async fn get_user(&self, id: UserId) -> Result<User, AuthError>;
}

//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::domain::UserId;
use crate::services::auth_service::{AuthError, AuthService, Registration};
use async_trait::async_trait;
use tracing::info;

pub const MAX_USERNAME_LENGTH: usize = 150;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        self.store
            .verify_user_password(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let errors = registration_errors(registration, self.security.min_password_length);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        if self.store.username_exists(&registration.username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let user = self
            .store
            .create_user(&registration.username, &registration.password, &self.security)
            .await?
            .ok_or(AuthError::UsernameTaken)?;

        info!("Registered user: {}", user.username);
        Ok(user)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.store.username_exists(username).await?)
    }

    async fn get_user(&self, id: UserId) -> Result<User, AuthError> {
        self.store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Every rule the registration form breaks, in the order they are shown.
#[must_use]
pub fn registration_errors(registration: &Registration, min_password_length: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if let Err(e) = check_username(&registration.username) {
        errors.push(e);
    }

    if registration.password != registration.password_confirmation {
        errors.push("The two password fields didn't match.".to_string());
    }

    errors.extend(password_errors(&registration.password, min_password_length));
    errors
}

pub fn check_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required.".to_string());
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(format!(
            "Username must be {MAX_USERNAME_LENGTH} characters or fewer."
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(
            "Username may contain only letters, numbers, and @/./+/-/_ characters.".to_string(),
        );
    }

    Ok(())
}

#[must_use]
pub fn password_errors(password: &str, min_length: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < min_length {
        errors.push(format!(
            "This password is too short. It must contain at least {min_length} characters."
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("This password is entirely numeric.".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, password: &str, confirmation: &str) -> Registration {
        Registration {
            username: username.to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(registration_errors(&form("alice", "s3cret-pass", "s3cret-pass"), 8).is_empty());
        assert!(registration_errors(&form("bob.smith+1@x", "longenough", "longenough"), 8).is_empty());
    }

    #[test]
    fn test_username_rules() {
        assert!(check_username("").is_err());
        assert!(check_username("has space").is_err());
        assert!(check_username("semi;colon").is_err());
        assert!(check_username(&"a".repeat(151)).is_err());
        assert!(check_username(&"a".repeat(150)).is_ok());
        assert!(check_username("émile_b").is_ok());
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(password_errors("short", 8).len(), 1);
        assert_eq!(password_errors("12345", 8).len(), 2);
        assert_eq!(password_errors("1234567890", 8).len(), 1);
        assert!(password_errors("good password", 8).is_empty());
    }

    #[test]
    fn test_mismatched_confirmation() {
        let errors = registration_errors(&form("alice", "s3cret-pass", "other-pass"), 8);
        assert_eq!(errors, vec!["The two password fields didn't match.".to_string()]);
    }
}

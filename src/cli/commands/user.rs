//! Create user command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthError, AuthService, Registration, SeaOrmAuthService};

pub async fn cmd_create_user(
    config: &Config,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone());

    let registration = Registration {
        username: username.to_string(),
        password: password.to_string(),
        password_confirmation: password.to_string(),
    };

    match auth.register(&registration).await {
        Ok(user) => {
            println!("✓ Created user '{}' (id {})", user.username, user.id);
            Ok(())
        }
        Err(AuthError::Validation(errors)) => {
            println!("Could not create user '{username}':");
            for error in errors {
                println!("  - {error}");
            }
            Ok(())
        }
        Err(AuthError::UsernameTaken) => {
            println!("User '{username}' already exists.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

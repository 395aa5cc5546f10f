//! Admin user management commands.
//!
//! Registration over the API always yields the `user` role; admins are
//! provisioned here, against the database directly.

use thiserror::Error;

use parceltrack_core::{Email, UserRole};
use parceltrack_server::db::RepositoryError;
use parceltrack_server::db::users::UserRepository;
use parceltrack_server::services::auth;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Connection setup failed.
    #[error(transparent)]
    Connect(#[from] super::ConnectError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password rejected.
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// User already exists.
    #[error("A user already exists with email: {0}")]
    UserExists(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

/// Create a new admin user.
///
/// # Errors
///
/// Returns `AdminError::UserExists` if the email is taken.
pub async fn create_user(email: &str, password: &str) -> Result<i32, AdminError> {
    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    if password.len() < 8 {
        return Err(AdminError::InvalidPassword(
            "password must be at least 8 characters".to_owned(),
        ));
    }

    let password_hash =
        auth::hash_password(password).map_err(|e| AdminError::InvalidPassword(e.to_string()))?;

    let pool = super::connect().await?;

    tracing::info!("Creating admin user: {}", email);

    let user = UserRepository::new(&pool)
        .create(&email, &password_hash, UserRole::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_string()),
            other => AdminError::Database(other),
        })?;

    tracing::info!("Admin user created with id {}", user.id);
    Ok(user.id.as_i32())
}

//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a valid bearer token in route handlers.
//! The token only proves identity; the user is reloaded from the database on
//! every request so role changes and deactivation apply immediately.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_owned()))?;

        let claims = state.jwt().verify(token)?;
        let user_id = claims.user_id()?;

        // The token may outlive the account; the database is authoritative.
        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_owned()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is deactivated".to_owned()));
        }

        Ok(Self(CurrentUser::from(&user)))
    }
}

/// Extractor that requires a valid bearer token for an admin user.
///
/// Rejects with 403 when the caller is authenticated but not an admin.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }

        Ok(Self(user))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

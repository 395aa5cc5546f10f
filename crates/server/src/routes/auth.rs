//! Auth route handlers.
//!
//! Registration and login both respond with the profile and a bearer token,
//! so the frontend can sign in immediately after creating an account.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use parceltrack_core::{UserId, UserRole};

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;
use crate::validation::Validator;

use super::ApiResponse;

/// A user profile as the API presents it.
#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for ProfileData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            role: user.role,
        }
    }
}

impl From<&CurrentUser> for ProfileData {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            role: user.role,
        }
    }
}

/// Profile plus a freshly issued bearer token.
#[derive(Debug, Serialize)]
pub struct SessionData {
    pub user: ProfileData,
    pub token: String,
}

/// Request body for register and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Pull out both fields, reporting each missing one.
    fn into_parts(self) -> Result<(String, String)> {
        let mut v = Validator::new();
        let email = v.require("email", self.email);
        let password = v.require("password", self.password);
        v.finish().map_err(AppError::Validation)?;

        let (Some(email), Some(password)) = (email, password) else {
            return Err(AppError::Internal(
                "validation passed with missing fields".to_owned(),
            ));
        };
        Ok((email, password))
    }
}

/// `POST /api/auth/register`
///
/// Create an account with the `user` role and sign in.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse> {
    let (email, password) = payload.into_parts()?;

    let user = AuthService::new(state.pool())
        .register(&email, &password)
        .await?;
    let token = state.jwt().issue(&user)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Account created successfully",
            SessionData {
                user: ProfileData::from(&user),
                token,
            },
        )),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse<SessionData>>> {
    let (email, password) = payload.into_parts()?;

    let user = AuthService::new(state.pool())
        .login(&email, &password)
        .await?;
    let token = state.jwt().issue(&user)?;

    Ok(Json(ApiResponse::ok(SessionData {
        user: ProfileData::from(&user),
        token,
    })))
}

/// Request body for password changes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// `PUT /api/auth/password`
///
/// Change the current user's password after re-verifying the old one.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    let mut v = Validator::new();
    let current = v.require("currentPassword", payload.current_password);
    let new = v.require("newPassword", payload.new_password);
    v.finish().map_err(AppError::Validation)?;

    let (Some(current), Some(new)) = (current, new) else {
        return Err(AppError::Internal(
            "validation passed with missing fields".to_owned(),
        ));
    };

    AuthService::new(state.pool())
        .change_password(&user.email, &current, &new)
        .await?;

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(Json(ApiResponse::message("Password updated successfully")))
}

/// `GET /api/auth/me`
pub async fn me(RequireAuth(user): RequireAuth) -> Json<ApiResponse<ProfileData>> {
    Json(ApiResponse::ok(ProfileData::from(&user)))
}

/// `GET /api/auth/users`
///
/// Active user directory, used by the admin UI to assign parcel owners.
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<ProfileData>>>> {
    let users = AuthService::new(state.pool()).list_users().await?;

    Ok(Json(ApiResponse::ok(
        users.iter().map(ProfileData::from).collect(),
    )))
}

//! HTTP route handlers for the parcel API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Database readiness check
//!
//! # Auth
//! POST /api/auth/register              - Create an account, returns profile + token
//! POST /api/auth/login                 - Login, returns profile + token
//! GET  /api/auth/me                    - Current profile (requires auth)
//! PUT  /api/auth/password              - Change password (requires auth)
//! GET  /api/auth/users                 - Active user directory (admin)
//!
//! # Parcels
//! POST /api/parcels                    - Create a parcel (admin)
//! GET  /api/parcels                    - List visible parcels, paginated
//! GET  /api/parcels/{trackingNumber}   - Fetch one parcel by tracking number
//! PUT  /api/parcels/{id}/status        - Append a status update
//! ```
//!
//! All `/api` responses share the envelope
//! `{"success": bool, "message"?, "data"?, "errors"?}`.

pub mod auth;
pub mod health;
pub mod parcels;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Standard success envelope for API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A success envelope wrapping `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// A success envelope with a message and `data`.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Create the auth routes router, nested under `/api/auth`.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/password", put(auth::change_password))
        .route("/users", get(auth::users))
}

/// Create the parcel routes router, nested under `/api/parcels`.
pub fn parcel_routes() -> Router<AppState> {
    // Sibling routes must share one capture name for this segment; the
    // status route reads it as a numeric id.
    Router::new()
        .route("/", post(parcels::create).get(parcels::list))
        .route("/{trackingNumber}", get(parcels::get_by_tracking_number))
        .route("/{trackingNumber}/status", put(parcels::update_status))
}

/// Create the health routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
}

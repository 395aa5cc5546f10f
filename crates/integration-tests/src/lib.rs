//! Integration tests for Parceltrack.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p parceltrack-cli -- migrate
//!
//! # Start the server
//! cargo run -p parceltrack-server
//!
//! # Run the ignored integration tests
//! cargo test -p parceltrack-integration-tests -- --ignored
//! ```
//!
//! Tests target a running server over HTTP; nothing here touches the
//! database directly. An admin account must exist
//! (`cargo run -p parceltrack-cli -- admin create ...`) with its credentials
//! in `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`.

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("PARCELTRACK_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Admin credentials for tests that need elevated access.
#[must_use]
pub fn admin_credentials() -> (String, String) {
    let email = std::env::var("TEST_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@parceltrack.test".to_string());
    let password =
        std::env::var("TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-password".to_string());
    (email, password)
}

/// Register a fresh user and return `(user_id, token)`.
///
/// # Panics
///
/// Panics if the request fails or the response is not the documented shape.
pub async fn register_user(client: &Client, email: &str, password: &str) -> (i64, String) {
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to register user");

    assert_eq!(resp.status(), 201, "register should return 201");
    let body: Value = resp.json().await.expect("Failed to parse register response");
    assert_eq!(body["success"], true);

    let user_id = body["data"]["user"]["id"]
        .as_i64()
        .expect("register response missing user id");
    let token = body["data"]["token"]
        .as_str()
        .expect("register response missing token")
        .to_owned();
    (user_id, token)
}

/// Login and return a bearer token.
///
/// # Panics
///
/// Panics if the credentials are rejected.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to login");

    assert_eq!(resp.status(), 200, "login should return 200");
    let body: Value = resp.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("login response missing token")
        .to_owned()
}

/// Login as the configured admin.
pub async fn admin_token(client: &Client) -> String {
    let (email, password) = admin_credentials();
    login(client, &email, &password).await
}

/// A unique email for test isolation.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@parceltrack.test", uuid::Uuid::new_v4())
}

/// A unique, well-formed tracking number.
#[must_use]
pub fn unique_tracking_number() -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(12)
        .collect();
    format!("TRK{}", suffix.to_uppercase())
}

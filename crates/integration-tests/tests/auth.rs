//! Integration tests for authentication endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p parceltrack-server)
//! - An admin account matching `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use parceltrack_integration_tests::{
    admin_token, base_url, login, register_user, unique_email,
};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_then_login() {
    let client = Client::new();
    let email = unique_email("register");

    let (user_id, token) = register_user(&client, &email, "test-password").await;
    assert!(user_id > 0);
    assert!(!token.is_empty());

    let login_token = login(&client, &email, "test-password").await;
    assert!(!login_token.is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_registration_conflicts() {
    let client = Client::new();
    let email = unique_email("duplicate");

    register_user(&client, &email, "test-password").await;

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({"email": email, "password": "test-password"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_with_wrong_password() {
    let client = Client::new();
    let email = unique_email("wrongpw");

    register_user(&client, &email, "test-password").await;

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({"email": email, "password": "not-the-password"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_short_password_is_rejected() {
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({"email": unique_email("shortpw"), "password": "short"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_me_reflects_token_holder() {
    let client = Client::new();
    let email = unique_email("me");
    let (user_id, token) = register_user(&client, &email, "test-password").await;

    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["id"].as_i64(), Some(user_id));
    assert_eq!(body["data"]["email"].as_str(), Some(email.as_str()));
    assert_eq!(body["data"]["role"].as_str(), Some("user"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_me_without_token_is_unauthorized() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_change_password_rotates_credentials() {
    let client = Client::new();
    let email = unique_email("rotate");
    let (_, token) = register_user(&client, &email, "test-password").await;

    // Wrong current password is rejected.
    let resp = client
        .put(format!("{}/api/auth/password", base_url()))
        .bearer_auth(&token)
        .json(&json!({"currentPassword": "not-the-password", "newPassword": "rotated-password"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // A short replacement is rejected.
    let resp = client
        .put(format!("{}/api/auth/password", base_url()))
        .bearer_auth(&token)
        .json(&json!({"currentPassword": "test-password", "newPassword": "short"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .put(format!("{}/api/auth/password", base_url()))
        .bearer_auth(&token)
        .json(&json!({"currentPassword": "test-password", "newPassword": "rotated-password"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    // The old password no longer logs in; the new one does.
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({"email": email, "password": "test-password"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let new_token = login(&client, &email, "rotated-password").await;
    assert!(!new_token.is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_user_directory_is_admin_only() {
    let client = Client::new();
    let (_, user_token) = register_user(&client, &unique_email("dir"), "test-password").await;

    let resp = client
        .get(format!("{}/api/auth/users", base_url()))
        .bearer_auth(&user_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&client).await;
    let resp = client
        .get(format!("{}/api/auth/users", base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["data"].as_array().is_some_and(|users| !users.is_empty()));
}

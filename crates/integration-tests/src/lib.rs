//! Integration tests for Shopdex.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p shopdex-cli -- migrate
//!
//! # Start the API server
//! cargo run -p shopdex-api
//!
//! # Run integration tests
//! cargo test -p shopdex-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a live server and a
//! `PostGIS`-enabled database. Each test registers throwaway accounts with
//! unique subjects, so reruns against the same database do not collide.
//!
//! Identity is simulated the same way the production gateway provides it:
//! by setting the trusted `x-auth-subject` header. Admin accounts are
//! promoted through the CLI's SQL path (`shopdex-cli admin grant`) - for
//! tests, a pre-provisioned admin subject is read from
//! `SHOPDEX_TEST_ADMIN_SUBJECT`.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// The trusted identity header the API expects from its gateway.
pub const AUTH_SUBJECT_HEADER: &str = "x-auth-subject";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHOPDEX_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Subject of a pre-provisioned admin account.
///
/// Provision one with: `shopdex-cli admin grant -s test-admin` after
/// registering it through the API.
#[must_use]
pub fn admin_subject() -> String {
    std::env::var("SHOPDEX_TEST_ADMIN_SUBJECT").unwrap_or_else(|_| "test-admin".to_string())
}

/// Plain HTTP client.
#[must_use]
pub fn client() -> Client {
    Client::new()
}

/// A fresh, unique identity-provider subject for this test run.
#[must_use]
pub fn fresh_subject(prefix: &str) -> String {
    format!("{prefix}|{}", Uuid::new_v4())
}

/// Register a member account for `subject` and return the user JSON.
///
/// # Panics
///
/// Panics if the request fails or the server rejects the registration.
pub async fn register_member(client: &Client, subject: &str) -> Value {
    let resp = client
        .post(format!("{}/member/register", base_url()))
        .header(AUTH_SUBJECT_HEADER, subject)
        .json(&json!({ "display_name": "Test Member" }))
        .send()
        .await
        .expect("register request failed");

    assert_eq!(resp.status(), 201, "registration should succeed");
    resp.json().await.expect("register response not JSON")
}

/// Approve a member account via the admin surface so it can create shops.
///
/// # Panics
///
/// Panics if the admin request fails.
pub async fn approve_member(client: &Client, user_id: i64) {
    let resp = client
        .post(format!("{}/admin/users/{user_id}/status", base_url()))
        .header(AUTH_SUBJECT_HEADER, admin_subject())
        .json(&json!({ "status": "approved" }))
        .send()
        .await
        .expect("approve request failed");

    assert_eq!(resp.status(), 200, "member approval should succeed");
}

/// Register and approve a member in one step; returns (subject, `user_id`).
///
/// # Panics
///
/// Panics if registration or approval fails.
pub async fn approved_member(client: &Client) -> (String, i64) {
    let subject = fresh_subject("member");
    let user = register_member(client, &subject).await;
    let user_id = user["id"].as_i64().expect("user id");
    approve_member(client, user_id).await;
    (subject, user_id)
}

/// Create a shop as `subject` and return the shop JSON.
///
/// # Panics
///
/// Panics if creation fails.
pub async fn create_shop(client: &Client, subject: &str, body: Value) -> Value {
    let resp = client
        .post(format!("{}/member/shops", base_url()))
        .header(AUTH_SUBJECT_HEADER, subject)
        .json(&body)
        .send()
        .await
        .expect("create shop request failed");

    assert_eq!(resp.status(), 201, "shop creation should succeed");
    resp.json().await.expect("create response not JSON")
}

/// Approve a shop via the admin surface.
///
/// # Panics
///
/// Panics if the admin request fails.
pub async fn approve_shop(client: &Client, shop_id: i64) {
    let resp = client
        .post(format!("{}/admin/shops/{shop_id}/status", base_url()))
        .header(AUTH_SUBJECT_HEADER, admin_subject())
        .json(&json!({ "status": "approved" }))
        .send()
        .await
        .expect("approve shop request failed");

    assert_eq!(resp.status(), 200, "shop approval should succeed");
}

/// A minimal valid shop body at the given coordinates.
#[must_use]
pub fn shop_body(name: &str, lat: f64, lng: f64) -> Value {
    json!({
        "shop_name": name,
        "latitude": lat,
        "longitude": lng,
        "tags": ["test"],
    })
}

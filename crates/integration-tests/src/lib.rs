//! Integration tests for Alto.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server (memory backend is fine)
//! ALTO_SESSION_SECRET=$(openssl rand -hex 32) cargo run -p alto-server
//!
//! # Run integration tests
//! cargo test -p alto-integration-tests -- --ignored
//! ```
//!
//! Tests target `ALTO_BASE_URL` (default `http://localhost:3000`). Admin
//! tests additionally need an admin user; create one with
//! `alto-cli admin create` and export `ALTO_TEST_ADMIN_USER` /
//! `ALTO_TEST_ADMIN_PASSWORD`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::json;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("ALTO_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A cookie-keeping HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log in as the test admin, keeping the session cookie on the client.
///
/// # Panics
///
/// Panics if the login request fails or is rejected.
pub async fn login_as_admin(client: &Client) {
    let username =
        std::env::var("ALTO_TEST_ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
    let password =
        std::env::var("ALTO_TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-password".to_string());

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(
        resp.status().is_success(),
        "admin login failed: {}",
        resp.status()
    );
}

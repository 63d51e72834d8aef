//! Integration tests for the admin session flow and protected routes.
//!
//! These tests require a running server and a seeded admin user:
//!
//! ```bash
//! alto-cli admin create -u admin -p admin-password
//! ALTO_TEST_ADMIN_USER=admin ALTO_TEST_ADMIN_PASSWORD=admin-password \
//!     cargo test -p alto-integration-tests -- --ignored
//! ```

use reqwest::StatusCode;
use serde_json::{Value, json};

use alto_integration_tests::{base_url, client, login_as_admin};

#[tokio::test]
#[ignore = "Requires running alto server and admin user"]
async fn test_login_sets_session_and_me_works() {
    let client = client();
    let base_url = base_url();

    // Unauthenticated /me is 401
    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("Failed to reach /api/auth/me");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    login_as_admin(&client).await;

    // Session cookie carries across requests
    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("Failed to reach /api/auth/me");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["username"].is_string());
}

#[tokio::test]
#[ignore = "Requires running alto server and admin user"]
async fn test_wrong_password_is_401() {
    let client = client();

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "username": "admin", "password": "definitely-wrong" }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running alto server and admin user"]
async fn test_logout_clears_session() {
    let client = client();
    let base_url = base_url();

    login_as_admin(&client).await;

    let resp = client
        .post(format!("{base_url}/api/auth/logout"))
        .send()
        .await
        .expect("Failed to send logout request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("Failed to reach /api/auth/me");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running alto server and admin user"]
async fn test_product_crud_roundtrip() {
    let client = client();
    let base_url = base_url();

    login_as_admin(&client).await;

    // Create
    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "name": "Lampe Integration",
            "color": "terracotta",
            "description": "Created by the integration suite.",
            "price": "119.00",
            "stock": 5
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Failed to parse product");
    let id = product["id"].as_i64().expect("product id");
    assert_eq!(product["slug"], "lampe-integration");

    // Update
    let resp = client
        .put(format!("{base_url}/api/products/{id}"))
        .json(&json!({ "stock": 7 }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(updated["stock"], 7);

    // Delete
    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running alto server and admin user"]
async fn test_orders_require_admin() {
    let client = client();

    let resp = client
        .get(format!("{}/api/orders", base_url()))
        .send()
        .await
        .expect("Failed to reach /api/orders");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

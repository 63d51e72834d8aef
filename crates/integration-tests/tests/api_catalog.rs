//! Integration tests for the public catalog API.
//!
//! These tests require a running server (memory backend is fine):
//! `ALTO_SESSION_SECRET=... cargo run -p alto-server`

use reqwest::StatusCode;
use serde_json::Value;

use alto_integration_tests::{base_url, client};

#[tokio::test]
#[ignore = "Requires running alto server"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running alto server"]
async fn test_product_listing_is_public() {
    let client = client();

    let resp = client
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore = "Requires running alto server"]
async fn test_unknown_product_is_404() {
    let client = client();

    let resp = client
        .get(format!("{}/api/products/999999", base_url()))
        .send()
        .await
        .expect("Failed to request product");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running alto server"]
async fn test_product_writes_require_admin() {
    let client = client();

    let resp = client
        .post(format!("{}/api/products", base_url()))
        .json(&serde_json::json!({
            "name": "Lampe Test",
            "color": "terracotta",
            "price": "99.00"
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running alto server"]
async fn test_active_version_is_public() {
    let client = client();

    let resp = client
        .get(format!("{}/api/versions/active", base_url()))
        .send()
        .await
        .expect("Failed to fetch active version");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["active"], true);
}

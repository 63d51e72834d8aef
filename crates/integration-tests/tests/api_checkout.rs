//! Integration tests for the checkout flow.
//!
//! These tests require a running server and an admin user (to create the
//! catalog they order against).

use reqwest::StatusCode;
use serde_json::{Value, json};

use alto_integration_tests::{base_url, client, login_as_admin};

fn customer_details() -> Value {
    json!({
        "email": "claire@example.com",
        "first_name": "Claire",
        "last_name": "Fontaine",
        "address_line1": "12 rue des Ateliers",
        "postal_code": "69001",
        "city": "Lyon",
        "country": "FR"
    })
}

async fn create_product(client: &reqwest::Client, stock: i64) -> i64 {
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": "Lampe Checkout",
            "color": "sable",
            "price": "89.00",
            "stock": stock
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Failed to parse product");
    product["id"].as_i64().expect("product id")
}

#[tokio::test]
#[ignore = "Requires running alto server and admin user"]
async fn test_checkout_creates_order_and_decrements_stock() {
    let client = client();
    let base_url = base_url();

    login_as_admin(&client).await;
    let product_id = create_product(&client, 10).await;

    let resp = client
        .post(format!("{base_url}/api/checkout"))
        .json(&json!({
            "customer": customer_details(),
            "items": [{ "product_id": product_id, "quantity": 2 }]
        }))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total"], "178.00");
    assert_eq!(order["items"].as_array().map(Vec::len), Some(1));

    let resp = client
        .get(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to fetch product");
    let product: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(product["stock"], 8);
}

#[tokio::test]
#[ignore = "Requires running alto server and admin user"]
async fn test_checkout_insufficient_stock_is_409() {
    let client = client();

    login_as_admin(&client).await;
    let product_id = create_product(&client, 1).await;

    let resp = client
        .post(format!("{}/api/checkout", base_url()))
        .json(&json!({
            "customer": customer_details(),
            "items": [{ "product_id": product_id, "quantity": 5 }]
        }))
        .send()
        .await
        .expect("Failed to checkout");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running alto server"]
async fn test_empty_cart_is_400() {
    let client = client();

    let resp = client
        .post(format!("{}/api/checkout", base_url()))
        .json(&json!({
            "customer": customer_details(),
            "items": []
        }))
        .send()
        .await
        .expect("Failed to checkout");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

//! Integration tests for health endpoints and the product catalog.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API running (cargo run -p filigree-api)
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` for the admin-gated cases
//!
//! Run with: cargo test -p filigree-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use filigree_integration_tests::{admin_client, api_base_url, client, create_product};

#[tokio::test]
#[ignore = "Requires running API"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to get /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to get /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_listing_is_paginated_and_public() {
    let admin = admin_client().await;
    create_product(&admin, 120, 10).await;

    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/v1/products?page=1&limit=5"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid body");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["page"], json!(1));
    assert!(body["totalProducts"].as_i64().expect("count missing") >= 1);
    assert!(body["data"].as_array().expect("data missing").len() <= 5);
}

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_category_filter_matches_only_that_category() {
    let admin = admin_client().await;
    create_product(&admin, 150, 10).await; // category: rings

    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/v1/products?category=rings"))
        .send()
        .await
        .expect("Failed to list products");
    let body: Value = resp.json().await.expect("Invalid body");

    let products = body["data"].as_array().expect("data missing");
    assert!(!products.is_empty());
    assert!(products.iter().all(|p| p["category"] == json!("rings")));
}

#[tokio::test]
#[ignore = "Requires running API"]
async fn test_create_requires_admin_token() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/v1/products"))
        .json(&json!({ "name": "Sneaky Product" }))
        .send()
        .await
        .expect("Failed to post product");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_selling_price_above_mrp_is_rejected() {
    let admin = admin_client().await;
    let base_url = api_base_url();

    let resp = admin
        .post(format!("{base_url}/api/v1/products"))
        .json(&json!({
            "name": "Overpriced Ring",
            "description": "sellingPrice above mrp",
            "mrp": "100",
            "sellingPrice": "150",
            "discount": "0",
            "category": "rings",
            "material": "gold",
            "purity": "22k",
            "weight": "2.0",
            "stock": 1,
            "images": ["/uploads/overpriced.jpg"],
            "occasion": "Gift",
        }))
        .send()
        .await
        .expect("Failed to post product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Invalid body");
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
#[ignore = "Requires running API"]
async fn test_unknown_product_is_404() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/v1/products/product/999999"))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_admin_login_rejects_bad_credentials() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/v1/admin/login"))
        .json(&json!({ "email": "admin@filigree.in", "password": "definitely-wrong" }))
        .send()
        .await
        .expect("Failed to post admin login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

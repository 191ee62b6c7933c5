//! Integration tests for the cart: merge semantics, total recomputation,
//! remove/clear behavior.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API running (cargo run -p filigree-api)
//! - `DATABASE_URL`, `ADMIN_EMAIL`, `ADMIN_PASSWORD` set
//!
//! Run with: cargo test -p filigree-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use filigree_integration_tests::{
    admin_client, api_base_url, client, create_product, db_pool, money, signup_verified_user,
};

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_cart_requires_auth() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/v1/cart"))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_empty_cart_has_canonical_shape() {
    let pool = db_pool().await;
    let client = client();
    let base_url = api_base_url();

    signup_verified_user(&client, &pool).await;

    let resp = client
        .get(format!("{base_url}/api/v1/cart"))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid body");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["items"], json!([]));
    assert!((money(&body["data"]["total"]) - 0.0).abs() < f64::EPSILON);
}

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_add_merges_quantities_and_recomputes_total() {
    let pool = db_pool().await;
    let admin = admin_client().await;
    let product_id = create_product(&admin, 50, 100).await;

    let client = client();
    let base_url = api_base_url();
    signup_verified_user(&client, &pool).await;

    // add({P, 3}) with sellingPrice 50 → total 150, one line of quantity 3
    let resp = client
        .post(format!("{base_url}/api/v1/cart"))
        .json(&json!({ "productId": product_id, "quantity": 3 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid body");
    let items = body["data"]["items"].as_array().expect("items missing");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], json!(3));
    assert!((money(&body["data"]["total"]) - 150.0).abs() < f64::EPSILON);

    // add({P, 2}) again → the line merges to 5, never duplicates; total 250
    let resp = client
        .post(format!("{base_url}/api/v1/cart"))
        .json(&json!({ "productId": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add to cart");
    let body: Value = resp.json().await.expect("Invalid body");
    let items = body["data"]["items"].as_array().expect("items missing");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], json!(5));
    assert!((money(&body["data"]["total"]) - 250.0).abs() < f64::EPSILON);
}

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_add_rejects_out_of_stock() {
    let pool = db_pool().await;
    let admin = admin_client().await;
    let product_id = create_product(&admin, 50, 2).await;

    let client = client();
    let base_url = api_base_url();
    signup_verified_user(&client, &pool).await;

    let resp = client
        .post(format!("{base_url}/api/v1/cart"))
        .json(&json!({ "productId": product_id, "quantity": 3 }))
        .send()
        .await
        .expect("Failed to post add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_update_to_zero_removes_line() {
    let pool = db_pool().await;
    let admin = admin_client().await;
    let product_id = create_product(&admin, 80, 50).await;

    let client = client();
    let base_url = api_base_url();
    signup_verified_user(&client, &pool).await;

    client
        .post(format!("{base_url}/api/v1/cart"))
        .json(&json!({ "productId": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add");

    // Exact-set semantics first.
    let resp = client
        .post(format!("{base_url}/api/v1/cart/update"))
        .json(&json!({ "productId": product_id, "quantity": 4 }))
        .send()
        .await
        .expect("Failed to update");
    let body: Value = resp.json().await.expect("Invalid body");
    assert_eq!(body["data"]["items"][0]["quantity"], json!(4));
    assert!((money(&body["data"]["total"]) - 320.0).abs() < f64::EPSILON);

    // Quantity zero deletes the line instead of erroring.
    let resp = client
        .post(format!("{base_url}/api/v1/cart/update"))
        .json(&json!({ "productId": product_id, "quantity": 0 }))
        .send()
        .await
        .expect("Failed to update");
    let body: Value = resp.json().await.expect("Invalid body");
    assert_eq!(body["data"]["items"], json!([]));
    assert!((money(&body["data"]["total"]) - 0.0).abs() < f64::EPSILON);

    // The product is gone now, so updating it again is a 404.
    let resp = client
        .post(format!("{base_url}/api/v1/cart/update"))
        .json(&json!({ "productId": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to post update");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API, database, and admin credentials"]
async fn test_remove_and_clear() {
    let pool = db_pool().await;
    let admin = admin_client().await;
    let first = create_product(&admin, 60, 50).await;
    let second = create_product(&admin, 90, 50).await;

    let client = client();
    let base_url = api_base_url();
    signup_verified_user(&client, &pool).await;

    for (id, quantity) in [(first, 1), (second, 2)] {
        client
            .post(format!("{base_url}/api/v1/cart"))
            .json(&json!({ "productId": id, "quantity": quantity }))
            .send()
            .await
            .expect("Failed to add");
    }

    // Removing an absent product is a 404.
    let resp = client
        .delete(format!("{base_url}/api/v1/cart/999999"))
        .send()
        .await
        .expect("Failed to delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Removing the first leaves only the second; total follows.
    let resp = client
        .delete(format!("{base_url}/api/v1/cart/{first}"))
        .send()
        .await
        .expect("Failed to delete");
    let body: Value = resp.json().await.expect("Invalid body");
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));
    assert!((money(&body["data"]["total"]) - 180.0).abs() < f64::EPSILON);

    // Clear empties without deleting the cart; a second clear still finds it.
    let resp = client
        .delete(format!("{base_url}/api/v1/cart"))
        .send()
        .await
        .expect("Failed to clear");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/v1/cart"))
        .send()
        .await
        .expect("Failed to get cart");
    let body: Value = resp.json().await.expect("Invalid body");
    assert_eq!(body["data"]["items"], json!([]));

    let resp = client
        .delete(format!("{base_url}/api/v1/cart"))
        .send()
        .await
        .expect("Failed to clear");
    assert_eq!(resp.status(), StatusCode::OK);
}

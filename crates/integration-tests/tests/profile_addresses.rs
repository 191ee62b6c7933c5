//! Integration tests for profile updates and the address book.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API running (cargo run -p filigree-api)
//! - `DATABASE_URL` pointing at the same database
//!
//! Run with: cargo test -p filigree-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use filigree_integration_tests::{api_base_url, client, db_pool, signup_verified_user};

fn address_payload(full_name: &str, is_default: bool) -> Value {
    json!({
        "action": "add",
        "fullName": full_name,
        "streetAddress": "12 MG Road",
        "city": "Pune",
        "state": "Maharashtra",
        "zip": "411001",
        "phone": "9876543210",
        "isDefault": is_default,
    })
}

async fn update_user(client: &Client, body: &Value) -> reqwest::Response {
    client
        .post(format!("{}/api/v1/users/user", api_base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to post user update")
}

async fn fetch_addresses(client: &Client) -> Vec<Value> {
    let resp = client
        .get(format!("{}/api/v1/auth/user", api_base_url()))
        .send()
        .await
        .expect("Failed to fetch user");
    let body: Value = resp.json().await.expect("Invalid body");
    body["user"]["address"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

#[tokio::test]
#[ignore = "Requires running API and database"]
async fn test_add_default_address_unsets_previous_default() {
    let pool = db_pool().await;
    let client = client();
    signup_verified_user(&client, &pool).await;

    for name in ["Home Address", "Office Address", "Parents Address"] {
        let resp = update_user(&client, &json!({ "address": address_payload(name, true) })).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let addresses = fetch_addresses(&client).await;
    assert_eq!(addresses.len(), 3);

    let defaults: Vec<_> = addresses
        .iter()
        .filter(|a| a["isDefault"] == json!(true))
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["fullName"], json!("Parents Address"));
}

#[tokio::test]
#[ignore = "Requires running API and database"]
async fn test_update_address_merges_fields() {
    let pool = db_pool().await;
    let client = client();
    signup_verified_user(&client, &pool).await;

    update_user(&client, &json!({ "address": address_payload("Home Address", false) })).await;
    let id = fetch_addresses(&client).await[0]["id"].clone();

    let resp = update_user(
        &client,
        &json!({ "address": { "action": "update", "_id": id, "city": "Mumbai", "isDefault": true } }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let addresses = fetch_addresses(&client).await;
    assert_eq!(addresses[0]["city"], json!("Mumbai"));
    // Untouched fields survive the merge.
    assert_eq!(addresses[0]["fullName"], json!("Home Address"));
    assert_eq!(addresses[0]["isDefault"], json!(true));

    // Updating an unknown id is a 404.
    let resp = update_user(
        &client,
        &json!({ "address": { "action": "update",
            "_id": "4f0c34cc-5f3a-4f0c-9c39-7dbb54bc34b0", "city": "Delhi" } }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API and database"]
async fn test_delete_address_and_silent_noop() {
    let pool = db_pool().await;
    let client = client();
    signup_verified_user(&client, &pool).await;

    update_user(&client, &json!({ "address": address_payload("Home Address", false) })).await;
    let id = fetch_addresses(&client).await[0]["id"].clone();

    let resp = update_user(&client, &json!({ "address": { "action": "delete", "_id": id } })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(fetch_addresses(&client).await.is_empty());

    // Deleting an id that matches nothing is a silent success.
    let resp = update_user(
        &client,
        &json!({ "address": { "action": "delete",
            "_id": "4f0c34cc-5f3a-4f0c-9c39-7dbb54bc34b0" } }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API and database"]
async fn test_non_updatable_fields_are_rejected() {
    let pool = db_pool().await;
    let client = client();
    signup_verified_user(&client, &pool).await;

    for payload in [
        json!({ "isVerified": true }),
        json!({ "otp": "123456" }),
        json!({ "_id": 1 }),
        json!({ "createdAt": "2026-01-01T00:00:00Z" }),
        json!({ "role": "admin" }),
    ] {
        let resp = update_user(&client, &payload).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
    }

    // An empty update is also a 400.
    let resp = update_user(&client, &json!({})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API and database"]
async fn test_profile_fields_update_in_place() {
    let pool = db_pool().await;
    let client = client();
    signup_verified_user(&client, &pool).await;

    let resp = update_user(
        &client,
        &json!({ "name": "Meera Iyer", "age": 31, "gender": "women",
                 "jewelleryInterests": ["Earrings", "Bracelets"] }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid body");
    assert_eq!(body["user"]["name"], json!("Meera Iyer"));
    assert_eq!(body["user"]["age"], json!(31));
    assert_eq!(body["user"]["gender"], json!("women"));
    assert_eq!(
        body["user"]["jewelleryInterests"],
        json!(["Earrings", "Bracelets"])
    );
}

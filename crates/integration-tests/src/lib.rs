//! Integration tests for Filigree.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and run migrations
//! cargo run -p filigree-cli -- migrate
//!
//! # Start the API
//! cargo run -p filigree-api
//!
//! # Run integration tests
//! cargo test -p filigree-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a running API and a
//! reachable database. The OTP flows are completed by reading the issued
//! code straight from `otp_credentials` - there is no other way to observe
//! it from the outside.
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - API under test (default: `http://localhost:3000`)
//! - `DATABASE_URL` - same database the API uses, for OTP lookups
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - admin credentials for catalog setup

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use sqlx::PgPool;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A fresh cookie-keeping HTTP client.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// A phone number unlikely to collide across test runs.
#[must_use]
pub fn unique_phone() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    let serial = COUNTER.fetch_add(1, Ordering::Relaxed) % 100;
    format!("9{:07}{serial:02}", nanos % 10_000_000)
}

/// An email address unlikely to collide across test runs.
#[must_use]
pub fn unique_email() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    let serial = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("user{nanos}{serial}@example.com")
}

/// Connect to the database the API uses, for OTP lookups.
pub async fn db_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .expect("DATABASE_URL must be set for integration tests");
    PgPool::connect(url.expose_secret())
        .await
        .expect("Failed to connect to test database")
}

/// Read the OTP most recently issued to a phone number.
pub async fn issued_otp(pool: &PgPool, phone: &str) -> String {
    let (code,): (String,) = sqlx::query_as(
        "SELECT o.code FROM otp_credentials o
         JOIN users u ON u.id = o.user_id
         WHERE u.phone = $1",
    )
    .bind(phone)
    .fetch_one(pool)
    .await
    .expect("No OTP issued for phone");
    code
}

/// Sign up and verify a fresh user; the client keeps the session cookie.
///
/// Returns `(phone, email, password)`.
pub async fn signup_verified_user(client: &Client, pool: &PgPool) -> (String, String, String) {
    let base_url = api_base_url();
    let phone = unique_phone();
    let email = unique_email();
    let password = "kanak123".to_string();

    let resp = client
        .post(format!("{base_url}/api/v1/auth/signup"))
        .json(&json!({
            "name": "Test Shopper",
            "phone": phone,
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to sign up");
    assert!(
        resp.status().is_success(),
        "signup failed: {}",
        resp.status()
    );

    let otp = issued_otp(pool, &phone).await;

    let resp = client
        .post(format!("{base_url}/api/v1/auth/verify-signup-otp"))
        .json(&json!({ "phone": phone, "otp": otp }))
        .send()
        .await
        .expect("Failed to verify OTP");
    assert!(
        resp.status().is_success(),
        "OTP verification failed: {}",
        resp.status()
    );

    (phone, email, password)
}

/// Read a money field as f64, whether it was serialized as a string or a
/// number (Decimal fields serialize as strings like "320.00").
#[must_use]
pub fn money(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse::<f64>().expect("unparseable money string"),
        Value::Number(n) => n.as_f64().expect("unparseable money number"),
        other => panic!("not a money value: {other:?}"),
    }
}

/// Log the admin in on a fresh client and return it.
pub async fn admin_client() -> Client {
    let base_url = api_base_url();
    let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set");
    let password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set");

    let client = client();
    let resp = client
        .post(format!("{base_url}/api/v1/admin/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in as admin");
    assert!(
        resp.status().is_success(),
        "admin login failed: {}",
        resp.status()
    );

    client
}

/// Create a catalog product through the admin API and return its id.
pub async fn create_product(admin: &Client, selling_price: i64, stock: i32) -> i64 {
    let base_url = api_base_url();

    let resp = admin
        .post(format!("{base_url}/api/v1/products"))
        .json(&json!({
            "name": "Test Gold Ring",
            "description": "Integration-test product",
            "mrp": (selling_price + 500).to_string(),
            "sellingPrice": selling_price.to_string(),
            "discount": "5",
            "category": "rings",
            "material": "gold",
            "purity": "22k",
            "weight": "4.2",
            "stock": stock,
            "images": ["/uploads/test-ring.jpg"],
            "occasion": "Daily Wear",
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert!(
        resp.status().is_success(),
        "product create failed: {}",
        resp.status()
    );

    let body: Value = resp.json().await.expect("Invalid product response");
    body["data"]["product"]["id"]
        .as_i64()
        .expect("Product id missing")
}

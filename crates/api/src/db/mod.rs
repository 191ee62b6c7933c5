//! Database operations for the API `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `users` - Accounts, embedded address book (JSONB)
//! - `otp_credentials` - One pending OTP per user (code, issued_at, consumed)
//! - `wishlist_items` - (user, product) pairs
//! - `products` - Catalog
//! - `carts` - One per user, line items as JSONB
//! - `orders` - Immutable checkout snapshots
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p filigree-cli -- migrate
//! ```

pub mod carts;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique phone/email).
    #[error("{0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to a `Conflict` with the field named the
/// way the storefront reports it, or pass the error through unchanged.
pub(crate) fn map_unique_violation(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        let field = db_err.constraint().map_or("field", |name| {
            if name.contains("phone") {
                "phone"
            } else if name.contains("email") {
                "email"
            } else {
                "field"
            }
        });
        return RepositoryError::Conflict(format!("This {field} is already registered."));
    }
    RepositoryError::Database(err)
}

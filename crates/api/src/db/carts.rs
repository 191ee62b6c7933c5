//! Cart repository: a keyed store from user identity to cart aggregate.
//!
//! One row per user, line items as JSONB. Mutation is a plain
//! read-modify-write with no optimistic-concurrency token: two concurrent
//! mutations for the same user are last-write-wins, matching the documented
//! behavior of the system this reimplements. A version column could be added
//! here without touching any caller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use filigree_core::{CartId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartLine};

/// Database row for a cart.
#[derive(sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: i32,
    items: sqlx::types::Json<Vec<CartLine>>,
    total: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Column list matching [`CartRow`].
const CART_COLUMNS: &str = "id, user_id, items, total, created_at, updated_at";

impl CartRow {
    fn into_domain(self) -> Cart {
        Cart {
            id: CartId::new(self.id),
            user: UserId::new(self.user_id),
            items: self.items.0,
            total: self.total,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the cart belonging to a user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_user(&self, user: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1"
        ))
        .bind(user.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CartRow::into_domain))
    }

    /// Create a cart for a user with initial items and total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including the
    /// unique-per-user constraint when racing another create).
    pub async fn create(
        &self,
        user: UserId,
        items: &[CartLine],
        total: Decimal,
    ) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "INSERT INTO carts (user_id, items, total)
             VALUES ($1, $2, $3)
             RETURNING {CART_COLUMNS}"
        ))
        .bind(user.as_i32())
        .bind(sqlx::types::Json(items))
        .bind(total)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_domain())
    }

    /// Overwrite a cart's items and total, stamping `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart row is gone.
    pub async fn save(
        &self,
        id: CartId,
        items: &[CartLine],
        total: Decimal,
    ) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "UPDATE carts SET items = $2, total = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {CART_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(sqlx::types::Json(items))
        .bind(total)
        .fetch_optional(self.pool)
        .await?;

        row.map(CartRow::into_domain).ok_or(RepositoryError::NotFound)
    }
}

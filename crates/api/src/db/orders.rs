//! Order repository.
//!
//! Orders are written once at checkout and never mutated except for the
//! status column.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use filigree_core::{OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, PaymentInfo, ShippingInfo};

/// Database row for an order.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    items: sqlx::types::Json<Vec<OrderItem>>,
    shipping: sqlx::types::Json<ShippingInfo>,
    payment: sqlx::types::Json<PaymentInfo>,
    items_price: Decimal,
    tax_price: Decimal,
    shipping_price: Decimal,
    total_price: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

/// Column list matching [`OrderRow`].
const ORDER_COLUMNS: &str = "id, user_id, items, shipping, payment, items_price, tax_price, \
     shipping_price, total_price, status, created_at";

impl OrderRow {
    fn into_domain(self) -> Result<Order, RepositoryError> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Order {
            id: OrderId::new(self.id),
            user: UserId::new(self.user_id),
            items: self.items.0,
            shipping: self.shipping.0,
            payment: self.payment.0,
            items_price: self.items_price,
            tax_price: self.tax_price,
            shipping_price: self.shipping_price,
            total_price: self.total_price,
            status,
            created_at: self.created_at,
        })
    }
}

/// Everything needed to persist a checkout snapshot.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user: UserId,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingInfo,
    pub payment: PaymentInfo,
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a checkout snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (user_id, items, shipping, payment, items_price, tax_price,
                 shipping_price, total_price, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.user.as_i32())
        .bind(sqlx::types::Json(&order.items))
        .bind(sqlx::types::Json(&order.shipping))
        .bind(sqlx::types::Json(&order.payment))
        .bind(order.items_price)
        .bind(order.tax_price)
        .bind(order.shipping_price)
        .bind(order.total_price)
        .bind(OrderStatus::default().as_str())
        .fetch_one(self.pool)
        .await?;

        row.into_domain()
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_domain).transpose()
    }

    /// All orders, newest first (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_domain).collect()
    }

    /// A user's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, user: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_domain).collect()
    }

    /// Set the status field, nothing else.
    ///
    /// Any status-to-status transition is accepted; there is no state machine
    /// here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_domain()
    }
}

//! Order service.
//!
//! Checkout snapshots the submitted item list into an immutable order.
//! Line prices come from the caller, not the catalog: a trust boundary
//! inherited from the system this reimplements and kept as-is. The four
//! totals are computed once here and never recomputed.

use rust_decimal::Decimal;
use sqlx::PgPool;

use filigree_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus};

use crate::db::OrderRepository;
use crate::db::orders::NewOrder;
use crate::error::{AppError, Result};
use crate::middleware::auth::Requester;
use crate::models::order::{Order, OrderItem, PaymentInfo, ShippingInfo};
use crate::models::user::User;

/// Fixed checkout pricing, computed once at order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
}

/// Flat 10% tax, no jurisdiction logic.
fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Flat shipping charge, no weight or distance logic.
fn shipping_flat() -> Decimal {
    Decimal::from(100)
}

/// Price the submitted items: itemsPrice = Σ price × quantity, 10% tax on
/// top, flat shipping, and the grand total.
#[must_use]
pub fn compute_pricing(items: &[OrderItem]) -> Pricing {
    let items_price: Decimal = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();
    let tax_price = items_price * tax_rate();
    let shipping_price = shipping_flat();
    let total_price = items_price + tax_price + shipping_price;

    Pricing {
        items_price,
        tax_price,
        shipping_price,
        total_price,
    }
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for a verified user.
    ///
    /// # Errors
    ///
    /// Fails 403 when the user has not passed verification and 400 when the
    /// item list is empty.
    pub async fn create(
        &self,
        user: &User,
        items: Vec<OrderItem>,
        shipping: ShippingInfo,
        payment_method: PaymentMethod,
    ) -> Result<Order> {
        if !user.is_verified {
            return Err(AppError::Forbidden(
                "Please verify your email and phone to place an order".to_string(),
            ));
        }

        if items.is_empty() {
            return Err(AppError::validation("Your cart is empty"));
        }

        let pricing = compute_pricing(&items);

        let order = self
            .orders
            .create(&NewOrder {
                user: user.id,
                items,
                shipping,
                payment: PaymentInfo {
                    method: payment_method,
                    status: PaymentStatus::default(),
                    payment_id: None,
                },
                items_price: pricing.items_price,
                tax_price: pricing.tax_price,
                shipping_price: pricing.shipping_price,
                total_price: pricing.total_price,
            })
            .await?;

        Ok(order)
    }

    /// Orders visible to the requester: their own for customers, everything
    /// for admins.
    ///
    /// # Errors
    ///
    /// Returns a database error if the read fails.
    pub async fn list_for(&self, requester: &Requester) -> Result<Vec<Order>> {
        let orders = match requester {
            Requester::Admin => self.orders.list_all().await?,
            Requester::Customer(user) => self.orders.list_by_user(user.id).await?,
        };
        Ok(orders)
    }

    /// A single order, with the ownership check applied.
    ///
    /// # Errors
    ///
    /// Fails 404 when absent and 403 when the requester is neither the owner
    /// nor an admin.
    pub async fn get_for(&self, requester: &Requester, id: OrderId) -> Result<Order> {
        let order = self
            .orders
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("No order found with that ID"))?;

        if let Requester::Customer(user) = requester
            && order.user != user.id
        {
            return Err(AppError::Forbidden(
                "You do not have permission to view this order".to_string(),
            ));
        }

        Ok(order)
    }

    /// Set an order's status. Admin-only; the route enforces that.
    ///
    /// # Errors
    ///
    /// Fails 404 when the order doesn't exist.
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        let order = self.orders.update_status(id, status).await.map_err(|err| {
            match err {
                crate::db::RepositoryError::NotFound => {
                    AppError::not_found("No order found with that ID")
                }
                other => AppError::Database(other),
            }
        })?;

        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use filigree_core::ProductId;

    fn item(price: i64, quantity: i32) -> OrderItem {
        OrderItem {
            product: ProductId::new(1),
            name: None,
            quantity,
            price: Decimal::from(price),
        }
    }

    #[test]
    fn test_pricing_spec_example() {
        // items=[{price:100, quantity:2}] → 200 / 20 / 100 / 320
        let pricing = compute_pricing(&[item(100, 2)]);
        assert_eq!(pricing.items_price, Decimal::from(200));
        assert_eq!(pricing.tax_price, Decimal::from(20));
        assert_eq!(pricing.shipping_price, Decimal::from(100));
        assert_eq!(pricing.total_price, Decimal::from(320));
    }

    #[test]
    fn test_pricing_sums_lines() {
        let pricing = compute_pricing(&[item(50, 3), item(200, 1)]);
        assert_eq!(pricing.items_price, Decimal::from(350));
        assert_eq!(pricing.tax_price, Decimal::from(35));
        assert_eq!(pricing.total_price, Decimal::from(485));
    }

    #[test]
    fn test_pricing_total_is_sum_of_parts() {
        let pricing = compute_pricing(&[item(129, 2), item(75, 5)]);
        assert_eq!(
            pricing.total_price,
            pricing.items_price + pricing.tax_price + pricing.shipping_price
        );
    }

    #[test]
    fn test_pricing_fractional_prices() {
        let fractional = OrderItem {
            product: ProductId::new(9),
            name: None,
            quantity: 2,
            price: Decimal::new(4950, 2), // 49.50
        };
        let pricing = compute_pricing(&[fractional]);
        assert_eq!(pricing.items_price, Decimal::from(99));
        assert_eq!(pricing.tax_price, Decimal::new(990, 2)); // 9.90
        assert_eq!(pricing.total_price, Decimal::new(20890, 2)); // 208.90
    }
}

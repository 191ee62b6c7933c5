//! Cart service.
//!
//! One mutable cart per user, found or created on first add. Every mutation
//! recomputes the cached total from the catalog's *current* selling prices
//! (one product read per line item, acceptable because carts are small) and
//! stamps `updated_at`. The total is not kept in sync with later price
//! changes; that staleness is part of the contract.

use rust_decimal::Decimal;
use sqlx::PgPool;

use filigree_core::{ProductId, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::cart::{Cart, CartLine, CartView, PopulatedCartItem};

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Add a product to the user's cart, merging quantities when the product
    /// is already a line item.
    ///
    /// # Errors
    ///
    /// Fails 400 when the product is missing or has less stock than the
    /// requested quantity. Stock is only checked here, never decremented.
    pub async fn add_item(
        &self,
        user: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart> {
        if quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        let product = self.products.get(product_id).await?;
        let product = match product {
            Some(p) if p.stock >= quantity => p,
            _ => {
                return Err(AppError::validation(
                    "Product not available or out of stock",
                ));
            }
        };

        match self.carts.find_by_user(user).await? {
            None => {
                let items = vec![CartLine {
                    product: product_id,
                    quantity,
                }];
                let total = line_total(product.selling_price, quantity);
                Ok(self.carts.create(user, &items, total).await?)
            }
            Some(mut cart) => {
                if let Some(index) = cart.line_index(product_id) {
                    if let Some(line) = cart.items.get_mut(index) {
                        line.quantity += quantity;
                    }
                } else {
                    cart.items.push(CartLine {
                        product: product_id,
                        quantity,
                    });
                }

                let total = self.recompute_total(&cart.items).await?;
                Ok(self.carts.save(cart.id, &cart.items, total).await?)
            }
        }
    }

    /// The user's cart with product data joined in.
    ///
    /// An absent or empty cart is not an error; it returns the canonical
    /// `{items: [], total: 0}` shape.
    ///
    /// # Errors
    ///
    /// Returns a database error if a read fails.
    pub async fn view(&self, user: UserId) -> Result<CartView> {
        let Some(cart) = self.carts.find_by_user(user).await? else {
            return Ok(CartView::empty());
        };

        if cart.items.is_empty() {
            return Ok(CartView::empty());
        }

        let ids: Vec<ProductId> = cart.items.iter().map(|line| line.product).collect();
        let products = self.products.get_many(&ids).await?;

        let items = cart
            .items
            .iter()
            .filter_map(|line| {
                products
                    .iter()
                    .find(|p| p.id == line.product)
                    .map(|product| PopulatedCartItem {
                        product: product.clone(),
                        quantity: line.quantity,
                    })
            })
            .collect();

        Ok(CartView {
            items,
            total: cart.total,
        })
    }

    /// Set a line's exact quantity; a quantity of zero or less removes the
    /// line.
    ///
    /// # Errors
    ///
    /// Fails 404 when the user has no cart or the product is not a line item.
    pub async fn update_item(
        &self,
        user: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart> {
        let mut cart = self
            .carts
            .find_by_user(user)
            .await?
            .ok_or_else(|| AppError::not_found("Cart not found"))?;

        let index = cart
            .line_index(product_id)
            .ok_or_else(|| AppError::not_found("Product not in cart"))?;

        if quantity <= 0 {
            cart.items.remove(index);
        } else if let Some(line) = cart.items.get_mut(index) {
            line.quantity = quantity;
        }

        let total = self.recompute_total(&cart.items).await?;
        Ok(self.carts.save(cart.id, &cart.items, total).await?)
    }

    /// Remove a line item.
    ///
    /// # Errors
    ///
    /// Fails 404 when the user has no cart or the product is not a line item.
    pub async fn remove_item(&self, user: UserId, product_id: ProductId) -> Result<Cart> {
        let mut cart = self
            .carts
            .find_by_user(user)
            .await?
            .ok_or_else(|| AppError::not_found("Cart not found"))?;

        let before = cart.items.len();
        cart.items.retain(|line| line.product != product_id);
        if cart.items.len() == before {
            return Err(AppError::not_found("Item not found in cart"));
        }

        let total = self.recompute_total(&cart.items).await?;
        Ok(self.carts.save(cart.id, &cart.items, total).await?)
    }

    /// Empty the cart without deleting the row.
    ///
    /// # Errors
    ///
    /// Fails 404 when the user has no cart.
    pub async fn clear(&self, user: UserId) -> Result<()> {
        let cart = self
            .carts
            .find_by_user(user)
            .await?
            .ok_or_else(|| AppError::not_found("Cart not found"))?;

        self.carts.save(cart.id, &[], Decimal::ZERO).await?;
        Ok(())
    }

    /// Recompute the total from current selling prices, one read per line.
    async fn recompute_total(&self, items: &[CartLine]) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for line in items {
            let product = self.products.get(line.product).await?.ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "cart references missing product {}",
                    line.product
                ))
            })?;
            total += line_total(product.selling_price, line.quantity);
        }
        Ok(total)
    }
}

/// Price of one line: unit selling price times quantity.
fn line_total(selling_price: Decimal, quantity: i32) -> Decimal {
    selling_price * Decimal::from(quantity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let price = Decimal::from(50);
        assert_eq!(line_total(price, 3), Decimal::from(150));
        assert_eq!(line_total(price, 0), Decimal::ZERO);
    }

    #[test]
    fn test_line_total_fractional_price() {
        let price = Decimal::new(4999, 2); // 49.99
        assert_eq!(line_total(price, 2), Decimal::new(9998, 2));
    }
}

//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use filigree_core::{CartId, ProductId, UserId};

use super::product::Product;

/// One line of a cart: a product reference and a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: ProductId,
    pub quantity: i32,
}

/// A user's cart.
///
/// Exactly one per user. The cached total equals the sum of current selling
/// prices at the moment of the last mutation; later price changes do not
/// touch it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user: UserId,
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Index of the line holding `product`, if present.
    #[must_use]
    pub fn line_index(&self, product: ProductId) -> Option<usize> {
        self.items.iter().position(|line| line.product == product)
    }
}

/// A cart line with its product joined in, for responses.
#[derive(Debug, Clone, Serialize)]
pub struct PopulatedCartItem {
    pub product: Product,
    pub quantity: i32,
}

/// The cart shape returned by `GET /cart`.
///
/// An absent or empty cart serializes as `{"items": [], "total": 0}` rather
/// than an error.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<PopulatedCartItem>,
    pub total: Decimal,
}

impl CartView {
    /// The canonical empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }
}

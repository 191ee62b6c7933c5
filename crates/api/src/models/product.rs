//! Product domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use filigree_core::{Category, Material, Occasion, ProductGender, ProductId, Purity};

/// A catalog product.
///
/// Carts, wishlists, and order line items reference products by id and are
/// never cascade-deleted with them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// List price. Selling price never exceeds this at creation time.
    pub mrp: Decimal,
    pub selling_price: Decimal,
    /// Discount percentage shown on the storefront.
    pub discount: Decimal,
    pub category: Category,
    pub sub_category: Option<String>,
    pub material: Material,
    /// Required when the material is gold, silver, or platinum.
    pub purity: Option<Purity>,
    /// Weight in grams, strictly positive.
    pub weight: Decimal,
    /// On-hand stock; checked at add-to-cart, never decremented.
    pub stock: i32,
    pub ratings_average: Decimal,
    pub ratings_quantity: i32,
    /// Image paths under /uploads/, first entry is the default image.
    pub images: Vec<String>,
    pub gender: ProductGender,
    pub occasion: Occasion,
    pub warranty_in_months: Option<i32>,
    pub is_returnable: bool,
    /// Required when the product is returnable.
    pub return_policy_days: Option<i32>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

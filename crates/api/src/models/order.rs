//! Order domain types.
//!
//! An order is an immutable snapshot taken at checkout: line prices are
//! captured from the submitted payload and the four totals are computed once,
//! never recomputed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use filigree_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus, Phone, Pincode, ProductId, UserId};

/// A snapshotted order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: i32,
    /// Price per unit captured at order time, independent of later catalog
    /// changes.
    pub price: Decimal,
}

/// Shipping destination captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: Pincode,
    pub phone: Phone,
}

/// Payment details for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user: UserId,
    pub items: Vec<OrderItem>,
    #[serde(rename = "shippingInfo")]
    pub shipping: ShippingInfo,
    #[serde(rename = "paymentInfo")]
    pub payment: PaymentInfo,
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

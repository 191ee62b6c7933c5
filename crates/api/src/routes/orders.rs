//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use filigree_core::{OrderId, OrderStatus, PaymentMethod, Phone, Pincode, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::auth::{AdminAuth, CurrentUser, Requester};
use crate::models::order::{OrderItem, ShippingInfo};
use crate::routes::AppJson;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// A submitted order line. The price is taken as-is from the caller and
/// snapshotted into the order.
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product: ProductId,
    pub name: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

/// Shipping address submitted at checkout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRequest {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

/// Checkout form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingRequest,
    pub payment_method: PaymentMethod,
}

/// Orders visible to the caller: own orders for customers, all for admins.
#[instrument(skip(state, requester))]
pub async fn list(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.pool()).list_for(&requester).await?;

    Ok(Json(json!({
        "success": true,
        "results": orders.len(),
        "data": { "orders": orders },
    })))
}

/// Checkout handler.
#[instrument(skip(state, user, request))]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(request): AppJson<CheckoutRequest>,
) -> Result<impl IntoResponse> {
    let items = request
        .items
        .into_iter()
        .map(|item| {
            if item.quantity < 1 {
                return Err(AppError::validation("Quantity must be at least 1"));
            }
            Ok(OrderItem {
                product: item.product,
                name: item.name,
                quantity: item.quantity,
                price: item.price,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let shipping = ShippingInfo {
        full_name: request.shipping_address.full_name,
        address: request.shipping_address.address,
        city: request.shipping_address.city,
        state: request.shipping_address.state,
        pincode: Pincode::parse(&request.shipping_address.pincode)?,
        phone: Phone::parse(&request.shipping_address.phone)?,
    };

    let order = OrderService::new(state.pool())
        .create(&user, items, shipping, request.payment_method)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "order": order } })),
    ))
}

/// Order detail, gated to the owner or an admin.
#[instrument(skip(state, requester))]
pub async fn show(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.pool())
        .get_for(&requester, id)
        .await?;

    Ok(Json(json!({ "success": true, "data": { "order": order } })))
}

/// Status-update form.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// Set an order's status. Only the status field changes; any transition is
/// accepted.
#[instrument(skip(state, request))]
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<OrderId>,
    AppJson(request): AppJson<StatusRequest>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.pool())
        .update_status(id, request.status)
        .await?;

    Ok(Json(json!({ "success": true, "data": { "order": order } })))
}

//! Cart route handlers.
//!
//! Every route operates on the authenticated user's own cart; the cart is
//! never addressed by id from the outside.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use filigree_core::ProductId;

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::routes::AppJson;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Add/update form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// The cart with product data joined in.
///
/// An absent or empty cart responds with the canonical empty shape, not an
/// error.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    let view = CartService::new(state.pool()).view(user.id).await?;

    if view.items.is_empty() {
        return Ok(Json(json!({
            "success": true,
            "message": "Cart is empty",
            "data": view,
        })));
    }

    Ok(Json(json!({ "success": true, "data": view })))
}

/// Add an item; an existing line for the product has its quantity merged.
#[instrument(skip(state, user))]
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(request): AppJson<CartItemRequest>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool())
        .add_item(user.id, request.product_id, request.quantity)
        .await?;

    Ok(Json(json!({ "success": true, "data": cart })))
}

/// Set a line's exact quantity; zero or less removes the line.
#[instrument(skip(state, user))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(request): AppJson<CartItemRequest>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool())
        .update_item(user.id, request.product_id, request.quantity)
        .await?;

    Ok(Json(json!({ "success": true, "data": cart })))
}

/// Remove a line item.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool())
        .remove_item(user.id, product_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Item removed",
        "data": cart,
    })))
}

/// Empty the cart; the cart row itself survives.
#[instrument(skip(state, user))]
pub async fn clear(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    CartService::new(state.pool()).clear(user.id).await?;

    Ok(Json(json!({ "success": true, "message": "Cart emptied" })))
}

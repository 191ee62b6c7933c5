//! User route handlers: admin listing, profile updates, wishlist.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use filigree_core::ProductId;

use crate::db::{ProductRepository, UserRepository};
use crate::db::users::UserFilter;
use crate::error::{AppError, Result};
use crate::middleware::auth::{AdminAuth, CurrentUser};
use crate::routes::AppJson;
use crate::services::profile::{ProfileService, UpdateUserRequest};
use crate::state::AppState;

/// User listing query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_verified: Option<bool>,
    pub search: Option<String>,
}

/// Paginated user listing for the admin panel.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let filter = UserFilter {
        name: query.name,
        email: query.email,
        phone: query.phone,
        is_verified: query.is_verified,
        search: query.search,
    };

    let (users, total) = UserRepository::new(state.pool())
        .list(&filter, page, limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Users fetched successfully",
        "data": users,
        "pagination": {
            "total": total,
            "page": page,
            "limit": limit,
            "totalPages": (total + limit - 1) / limit,
        },
    })))
}

/// Profile update: in-place fields, password, or one address action.
#[instrument(skip(state, user, request))]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(request): AppJson<UpdateUserRequest>,
) -> Result<impl IntoResponse> {
    let updated = ProfileService::new(state.pool())
        .update_user(&user, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "User updated successfully",
        "user": updated,
    })))
}

/// Wishlist add form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub product_id: ProductId,
}

/// Add a product to the wishlist; duplicates are a 400.
#[instrument(skip(state, user))]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(request): AppJson<WishlistRequest>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());

    let added = users.add_wishlist_item(user.id, request.product_id).await?;
    if !added {
        return Err(AppError::validation("Product already in wishlist"));
    }

    let wishlist = users.wishlist_product_ids(user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Added to wishlist",
        "wishlist": wishlist,
    })))
}

/// Remove a product from the wishlist (no error if it wasn't there).
#[instrument(skip(state, user))]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());

    users.remove_wishlist_item(user.id, product_id).await?;
    let wishlist = users.wishlist_product_ids(user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Removed from wishlist",
        "wishlist": wishlist,
    })))
}

/// The wishlist with product data joined in.
#[instrument(skip(state, user))]
pub async fn get_wishlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    let ids = UserRepository::new(state.pool())
        .wishlist_product_ids(user.id)
        .await?;
    let products = ProductRepository::new(state.pool()).get_many(&ids).await?;

    Ok(Json(json!({ "success": true, "wishlist": products })))
}

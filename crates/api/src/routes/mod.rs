//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (pings the database)
//!
//! # Admin
//! POST /api/v1/admin/login              - Admin login (env-configured credentials)
//!
//! # Auth
//! POST /api/v1/auth/signup              - Register (unverified) + send OTP
//! POST /api/v1/auth/login               - Login with password or OTP
//! POST /api/v1/auth/send-otp            - Issue OTP for login/verification
//! POST /api/v1/auth/forgot-password     - Issue password-reset OTP
//! POST /api/v1/auth/reset-password      - Reset password with OTP
//! POST /api/v1/auth/verify-signup-otp   - Verify OTP, promote to verified
//! POST /api/v1/auth/logout              - Clear the session cookie
//! POST /api/v1/auth/change-password     - Change password (auth)
//! GET  /api/v1/auth/user                - Current user (auth)
//! DELETE /api/v1/auth/delete-account    - Delete account (auth)
//!
//! # Users
//! GET  /api/v1/users                    - List users (admin)
//! POST /api/v1/users/user               - Profile/address update (auth)
//! POST /api/v1/users/wishlist           - Add to wishlist (auth)
//! DELETE /api/v1/users/wishlist/{id}    - Remove from wishlist (auth)
//! GET  /api/v1/users/wishlist           - Wishlist with products (auth)
//!
//! # Products
//! POST /api/v1/products                 - Create product (admin)
//! GET  /api/v1/products                 - Filtered, paginated listing
//! GET  /api/v1/products/product/{id}    - Product detail
//! DELETE /api/v1/products/product/{id}  - Delete product (admin)
//! POST /api/v1/products/update/{id}     - Partial update (admin)
//!
//! # Orders
//! GET  /api/v1/orders                   - Own orders, or all for admin
//! POST /api/v1/orders                   - Checkout (auth, verified)
//! GET  /api/v1/orders/{id}              - Order detail (owner or admin)
//! PATCH /api/v1/orders/{id}/status      - Set status (admin)
//!
//! # Cart (auth)
//! GET  /api/v1/cart                     - Cart with products and total
//! POST /api/v1/cart                     - Add item (merges quantities)
//! POST /api/v1/cart/update              - Set exact quantity (<= 0 removes)
//! DELETE /api/v1/cart/{productId}       - Remove item
//! DELETE /api/v1/cart                   - Clear cart
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    extract::{FromRequest, Request, rejection::JsonRejection},
    routing::{delete, get, patch, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// JSON extractor whose rejection is a 400 in the API's error envelope
/// instead of axum's default 422 plain-text response.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/login", post(admin::login))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/send-otp", post(auth::send_otp))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/verify-signup-otp", post(auth::verify_signup_otp))
        .route("/logout", post(auth::logout))
        .route("/change-password", post(auth::change_password))
        .route("/user", get(auth::current_user))
        .route("/delete-account", delete(auth::delete_account))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/user", post(users::update_user))
        .route(
            "/wishlist",
            get(users::get_wishlist).post(users::add_to_wishlist),
        )
        .route("/wishlist/{product_id}", delete(users::remove_from_wishlist))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/product/{id}",
            get(products::show).delete(products::remove),
        )
        .route("/update/{id}", post(products::update))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart::show).post(cart::add).delete(cart::clear),
        )
        .route("/update", post(cart::update))
        .route("/{product_id}", delete(cart::remove))
}

/// Create all routes for the API, under the versioned prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/v1/admin", admin_routes())
        .nest("/api/v1/auth", auth_routes())
        .nest("/api/v1/users", user_routes())
        .nest("/api/v1/products", product_routes())
        .nest("/api/v1/orders", order_routes())
        .nest("/api/v1/cart", cart_routes())
}

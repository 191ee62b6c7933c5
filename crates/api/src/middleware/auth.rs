//! Authentication extractors.
//!
//! The session credential is a signed token in an httpOnly cookie:
//! `auth_token` for customers, `admin_token` for the admin surface. An
//! extractor verifies the token, loads the referenced user (never its
//! password hash), and attaches the identity to the handler. A token whose
//! user no longer exists is as good as no token.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use filigree_core::UserId;

use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::user::User;
use crate::services::token::{Role, TOKEN_TTL_SECS};
use crate::state::AppState;

/// Cookie carrying the customer session token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Cookie carrying the admin session token.
pub const ADMIN_COOKIE: &str = "admin_token";

/// Extractor that requires a logged-in customer.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = load_customer(&parts.headers, state).await?;
        set_sentry_user(&user.id, Some(user.email.as_str()));
        Ok(Self(user))
    }
}

/// Extractor that requires an admin token.
///
/// No credential at all is 401; a caller who is authenticated as a customer
/// but not as the admin is 403.
#[derive(Debug)]
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = cookie_value(&parts.headers, ADMIN_COOKIE) {
            let claims = state.tokens().verify(&token)?;
            if claims.role == Role::Admin {
                return Ok(Self);
            }
        }

        // A logged-in customer is authenticated, just not allowed here.
        if load_customer(&parts.headers, state).await.is_ok() {
            return Err(AppError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ));
        }

        Err(AppError::Unauthorized("Unauthorized".to_string()))
    }
}

/// Either a logged-in customer or the admin, whichever credential is present.
///
/// The admin cookie wins when both are set.
pub enum Requester {
    Customer(User),
    Admin,
}

impl FromRequestParts<AppState> for Requester {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = cookie_value(&parts.headers, ADMIN_COOKIE)
            && let Ok(claims) = state.tokens().verify(&token)
            && claims.role == Role::Admin
        {
            return Ok(Self::Admin);
        }

        let user = load_customer(&parts.headers, state).await?;
        set_sentry_user(&user.id, Some(user.email.as_str()));
        Ok(Self::Customer(user))
    }
}

/// Verify the customer cookie and load the user it references.
async fn load_customer(headers: &HeaderMap, state: &AppState) -> Result<User, AppError> {
    let token = cookie_value(headers, AUTH_COOKIE)
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

    let claims = state.tokens().verify(&token)?;
    let user_id = claims
        .sub
        .filter(|_| claims.role == Role::User)
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

    UserRepository::new(state.pool())
        .get_by_id(UserId::new(user_id))
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))
}

/// Pull a cookie value out of the `Cookie` header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

/// `Set-Cookie` value establishing a session cookie for seven days.
#[must_use]
pub fn session_cookie(name: &str, token: &str) -> String {
    format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={TOKEN_TTL_SECS}")
}

/// `Set-Cookie` value clearing a session cookie.
#[must_use]
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

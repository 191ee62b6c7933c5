//! Admin login route.
//!
//! The admin identity is configured through the environment, not stored in
//! the database; logging in mints a role-only token in its own cookie.

use axum::{
    Json,
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::auth::{ADMIN_COOKIE, session_cookie};
use crate::routes::AppJson;
use crate::state::AppState;

/// Admin login form.
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// Admin login handler.
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<AdminLoginRequest>,
) -> Result<impl IntoResponse> {
    let admin = &state.config().admin;
    let authentic =
        request.email == admin.email && request.password == *admin.password.expose_secret();

    if !authentic {
        return Err(AppError::Unauthorized(
            "Invalid admin credentials".to_string(),
        ));
    }

    let token = state.tokens().issue_admin()?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(ADMIN_COOKIE, &token))]),
        Json(json!({ "success": true, "message": "Admin logged in successfully" })),
    ))
}

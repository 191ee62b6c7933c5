//! Auth route handlers: signup, OTP flows, login, password management.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{AppendHeaders, IntoResponse},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use filigree_core::{Email, OtpCode, Phone};

use crate::error::{AppError, Result};
use crate::middleware::auth::{AUTH_COOKIE, CurrentUser, clear_cookie, session_cookie};
use crate::routes::AppJson;
use crate::services::auth::{AuthService, LoginCredential, SignupOutcome};
use crate::state::AppState;

/// Signup form.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// Signup handler: creates an unverified account (or re-issues an OTP to an
/// existing unverified one) and delivers the OTP.
#[instrument(skip(state, request))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> Result<impl IntoResponse> {
    let phone = Phone::parse(&request.phone)?;
    let email = Email::parse(&request.email)?;

    let auth = AuthService::new(state.pool());
    let (outcome, code) = auth
        .signup(&request.name, &phone, &email, &request.password)
        .await?;

    state.sms().send_otp(&phone, &code).await;

    let (status, message) = match outcome {
        SignupOutcome::Created => (
            StatusCode::CREATED,
            "User registered successfully. Please verify OTP sent to your phone.",
        ),
        SignupOutcome::OtpReissued => (
            StatusCode::OK,
            "OTP sent again. Please verify your number to complete registration.",
        ),
    };

    Ok((
        status,
        Json(json!({ "success": true, "message": message })),
    ))
}

/// Login form: phone or email, plus a password or an OTP.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub otp: Option<String>,
}

/// Login handler. An OTP wins over a password when both are sent.
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    if request.phone.is_none() && request.email.is_none() {
        return Err(AppError::validation("Please provide phone or email"));
    }

    let phone = request.phone.as_deref().map(Phone::parse).transpose()?;
    let email = request.email.as_deref().map(Email::parse).transpose()?;

    let credential = if let Some(otp) = &request.otp {
        LoginCredential::Otp(OtpCode::parse(otp)?)
    } else if let Some(password) = &request.password {
        LoginCredential::Password(password.clone())
    } else {
        return Err(AppError::validation("Please provide OTP or password"));
    };

    let auth = AuthService::new(state.pool());
    let user = auth.login(phone.as_ref(), email.as_ref(), credential).await?;

    let token = state.tokens().issue_user(user.id)?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(AUTH_COOKIE, &token))]),
        Json(json!({ "success": true, "message": "Login successful", "user": user })),
    ))
}

/// Phone-only form shared by the OTP-issuing routes.
#[derive(Debug, Deserialize)]
pub struct PhoneRequest {
    pub phone: String,
}

/// Issue an OTP for login (verified users) or verification (unverified).
#[instrument(skip(state, request))]
pub async fn send_otp(
    State(state): State<AppState>,
    AppJson(request): AppJson<PhoneRequest>,
) -> Result<impl IntoResponse> {
    let phone = Phone::parse(&request.phone)?;

    let auth = AuthService::new(state.pool());
    let (user, code) = auth.send_otp(&phone).await?;

    state.sms().send_otp(&phone, &code).await;

    let message = if user.is_verified {
        "OTP resent for login"
    } else {
        "OTP resent for verification"
    };

    Ok(Json(json!({ "success": true, "message": message })))
}

/// Issue a password-reset OTP to a verified account.
#[instrument(skip(state, request))]
pub async fn forgot_password(
    State(state): State<AppState>,
    AppJson(request): AppJson<PhoneRequest>,
) -> Result<impl IntoResponse> {
    let phone = Phone::parse(&request.phone)?;

    let auth = AuthService::new(state.pool());
    let (_, code) = auth.forgot_password(&phone).await?;

    state.sms().send_otp(&phone, &code).await;

    Ok(Json(json!({
        "success": true,
        "message": "OTP sent to your registered number for password reset",
    })))
}

/// Password-reset form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub phone: String,
    pub otp: String,
    pub new_password: String,
}

/// Reset a password with a previously issued OTP.
#[instrument(skip(state, request))]
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(request): AppJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse> {
    let phone = Phone::parse(&request.phone)?;
    let otp = OtpCode::parse(&request.otp)?;

    let auth = AuthService::new(state.pool());
    auth.reset_password(&phone, &otp, &request.new_password)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password has been reset successfully",
    })))
}

/// Signup OTP verification form.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub otp: String,
}

/// Verify a signup OTP: promotes the account and logs it in.
#[instrument(skip(state, request))]
pub async fn verify_signup_otp(
    State(state): State<AppState>,
    AppJson(request): AppJson<VerifyOtpRequest>,
) -> Result<impl IntoResponse> {
    let phone = Phone::parse(&request.phone)?;
    let otp = OtpCode::parse(&request.otp)?;

    let auth = AuthService::new(state.pool());
    let user = auth.verify_signup_otp(&phone, &otp).await?;

    let token = state.tokens().issue_user(user.id)?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(AUTH_COOKIE, &token))]),
        Json(json!({
            "success": true,
            "message": "OTP verified successfully, you are now logged in",
            "user": user,
        })),
    ))
}

/// Logout handler: clears the session cookie.
#[instrument]
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, clear_cookie(AUTH_COOKIE))]),
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    )
}

/// Password-change form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change the logged-in user's password.
#[instrument(skip(state, user, request))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(request): AppJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    auth.change_password(user.id, &request.current_password, &request.new_password)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully",
    })))
}

/// Return the logged-in user.
#[instrument(skip(user))]
pub async fn current_user(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(json!({ "success": true, "user": user }))
}

/// Delete the logged-in user's account and clear the cookie.
#[instrument(skip(state, user))]
pub async fn delete_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    auth.delete_account(user.id).await?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_cookie(AUTH_COOKIE))]),
        Json(json!({ "success": true, "message": "Account deleted" })),
    ))
}

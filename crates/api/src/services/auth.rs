//! Authentication service.
//!
//! Owns signup, OTP verification, login (password or OTP), and the password
//! flows. Passwords are hashed with Argon2id; OTPs are one-per-user
//! credential rows with a ten-minute lifetime, consumed on first successful
//! use.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{TimeDelta, Utc};
use rand::Rng;
use sqlx::PgPool;

use filigree_core::{Email, OtpCode, Phone, UserId};

use crate::db::users::{OtpRecord, UserRepository};
use crate::error::{AppError, Result};
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// How long an issued OTP stays valid.
const OTP_TTL_MINUTES: i64 = 10;

/// How a signup request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    /// A new unverified account was created.
    Created,
    /// An unverified account already existed; a fresh OTP was issued to it.
    OtpReissued,
}

/// What a login request authenticated with.
#[derive(Debug, Clone)]
pub enum LoginCredential {
    Password(String),
    Otp(OtpCode),
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account, or re-issue an OTP to an unverified one.
    ///
    /// Returns the outcome plus the OTP and phone it should be delivered to.
    ///
    /// # Errors
    ///
    /// Fails 400 when the phone or email already belongs to a verified
    /// account, or when a field fails validation.
    pub async fn signup(
        &self,
        name: &str,
        phone: &Phone,
        email: &Email,
        password: &str,
    ) -> Result<(SignupOutcome, OtpCode)> {
        let by_phone = self.users.get_by_phone(phone).await?;
        let by_email = self.users.get_by_email(email).await?;

        let same_account = match (&by_phone, &by_email) {
            (Some(p), Some(e)) => p.id == e.id,
            _ => false,
        };

        if same_account && by_phone.as_ref().is_some_and(|u| u.is_verified) {
            return Err(AppError::validation(
                "User already registered. Please log in.",
            ));
        }

        if by_phone.as_ref().is_some_and(|u| u.is_verified) && !same_account {
            return Err(AppError::validation(
                "This phone number is already registered.",
            ));
        }

        if by_email.as_ref().is_some_and(|u| u.is_verified) && !same_account {
            return Err(AppError::validation("This email is already registered."));
        }

        // An unverified account holds the phone or email; treat this as a
        // signup retry and re-issue its OTP instead of creating a duplicate.
        if let Some(existing) = by_phone.or(by_email) {
            let code = generate_otp();
            self.users.issue_otp(existing.id, &code).await?;
            return Ok((SignupOutcome::OtpReissued, code));
        }

        validate_name(name)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self.users.create(name, phone, email, &password_hash).await?;

        let code = generate_otp();
        self.users.issue_otp(user.id, &code).await?;

        Ok((SignupOutcome::Created, code))
    }

    /// Consume a signup OTP and promote the account to verified.
    ///
    /// # Errors
    ///
    /// Fails 404 for an unknown phone and 401 for a wrong, consumed, or
    /// expired code.
    pub async fn verify_signup_otp(&self, phone: &Phone, code: &OtpCode) -> Result<User> {
        let user = self
            .users
            .get_by_phone(phone)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.check_and_consume_otp(user.id, code).await?;
        self.users.mark_verified(user.id).await?;

        self.users
            .get_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Log in with phone or email plus a password or an OTP.
    ///
    /// # Errors
    ///
    /// Fails 400 for an unknown account, 403 when unverified, and 401 for a
    /// wrong password or OTP.
    pub async fn login(
        &self,
        phone: Option<&Phone>,
        email: Option<&Email>,
        credential: LoginCredential,
    ) -> Result<User> {
        let user = match (phone, email) {
            (Some(phone), _) => self.users.get_by_phone(phone).await?,
            (None, Some(email)) => self.users.get_by_email(email).await?,
            (None, None) => {
                return Err(AppError::validation("Please provide phone or email"));
            }
        }
        .ok_or_else(|| AppError::validation("User not found"))?;

        if !user.is_verified {
            return Err(AppError::Forbidden(
                "User is not verified. Please verify OTP first.".to_string(),
            ));
        }

        match credential {
            LoginCredential::Otp(code) => {
                self.check_and_consume_otp(user.id, &code).await?;
            }
            LoginCredential::Password(password) => {
                let (_, hash) = self
                    .users
                    .get_auth(user.id)
                    .await?
                    .ok_or_else(|| AppError::validation("User not found"))?;
                verify_password(&password, &hash)
                    .map_err(|_| AppError::Unauthorized("Invalid password".to_string()))?;
            }
        }

        Ok(user)
    }

    /// Issue an OTP to an existing account, for login or verification.
    ///
    /// Returns the user so the caller can word the response by verification
    /// state.
    ///
    /// # Errors
    ///
    /// Fails 404 when no account holds the phone number.
    pub async fn send_otp(&self, phone: &Phone) -> Result<(User, OtpCode)> {
        let user = self
            .users
            .get_by_phone(phone)
            .await?
            .ok_or_else(|| AppError::not_found("User not found. Please sign up first."))?;

        let code = generate_otp();
        self.users.issue_otp(user.id, &code).await?;

        Ok((user, code))
    }

    /// Issue a password-reset OTP to a verified account.
    ///
    /// # Errors
    ///
    /// Fails 404 when no verified account holds the phone number.
    pub async fn forgot_password(&self, phone: &Phone) -> Result<(User, OtpCode)> {
        let user = self.users.get_by_phone(phone).await?;
        let user = match user {
            Some(user) if user.is_verified => user,
            _ => {
                return Err(AppError::not_found(
                    "Verified user with this phone not found",
                ));
            }
        };

        let code = generate_otp();
        self.users.issue_otp(user.id, &code).await?;

        Ok((user, code))
    }

    /// Reset a password after OTP verification.
    ///
    /// # Errors
    ///
    /// Fails 404 for an unknown or unverified account and 401 for a bad OTP.
    pub async fn reset_password(
        &self,
        phone: &Phone,
        code: &OtpCode,
        new_password: &str,
    ) -> Result<()> {
        let user = self.users.get_by_phone(phone).await?;
        let user = match user {
            Some(user) if user.is_verified => user,
            _ => return Err(AppError::not_found("Verified user not found")),
        };

        self.check_and_consume_otp(user.id, code).await?;

        validate_password(new_password)?;
        let hash = hash_password(new_password)?;
        self.users.update_password(user.id, &hash).await?;

        Ok(())
    }

    /// Change the password of a logged-in user.
    ///
    /// # Errors
    ///
    /// Fails 401 when the current password doesn't match.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let (_, hash) = self
            .users
            .get_auth(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        verify_password(current_password, &hash)
            .map_err(|_| AppError::Unauthorized("Incorrect current password".to_string()))?;

        validate_password(new_password)?;
        let new_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        Ok(())
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails; deleting an already
    /// deleted account is not an error.
    pub async fn delete_account(&self, user_id: UserId) -> Result<()> {
        self.users.delete(user_id).await?;
        Ok(())
    }

    /// Validate a pending OTP and mark it consumed.
    async fn check_and_consume_otp(&self, user_id: UserId, entered: &OtpCode) -> Result<()> {
        let record = self.users.get_otp(user_id).await?;

        match record {
            Some(record) if otp_matches(&record, entered) => {
                self.users.consume_otp(user_id).await?;
                Ok(())
            }
            _ => Err(AppError::Unauthorized("Invalid OTP".to_string())),
        }
    }
}

/// Whether a stored OTP record accepts the entered code right now.
fn otp_matches(record: &OtpRecord, entered: &OtpCode) -> bool {
    if record.consumed {
        return false;
    }
    if Utc::now() - record.issued_at > TimeDelta::minutes(OTP_TTL_MINUTES) {
        return false;
    }
    record.code == entered.as_str()
}

/// Generate a fresh six-digit OTP.
fn generate_otp() -> OtpCode {
    let n = rand::rng().random_range(100_000..=999_999_u32);
    OtpCode::from_u32(n).expect("value is within the six-digit range")
}

/// Validate a display name: 2-50 characters, letters and spaces.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.len() < 2 || trimmed.len() > 50 {
        return Err(AppError::validation("Name must be 2-50 characters"));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return Err(AppError::validation(
            "Name can only contain letters and spaces",
        ));
    }
    Ok(())
}

/// Validate password strength: at least six characters with a lowercase
/// letter and a digit.
pub(crate) fn validate_password(password: &str) -> Result<()> {
    let strong = password.len() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit());

    if strong {
        Ok(())
    } else {
        Err(AppError::validation(
            "Password must be strong (min 6 chars with at least 1 number)",
        ))
    }
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::Internal("password hashing failed".to_string()))
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> std::result::Result<(), ()> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| ())?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ())
}

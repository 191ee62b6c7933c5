//! Signed session tokens.
//!
//! The session credential is an HS256 JWT carried in an httpOnly cookie.
//! Customer tokens carry the user id as `sub`; admin tokens carry only the
//! role claim, since the admin identity is configured, not stored.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use filigree_core::UserId;

use crate::error::AppError;

/// Token lifetime: seven days, matching the cookie Max-Age.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Errors from signing or verifying tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

/// The caller role baked into a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id for customer tokens; absent for admin tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<i32>,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signer/verifier for session tokens.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenSigner {
    /// Create a signer from the shared secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a customer token for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] if signing fails.
    pub fn issue_user(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue(Claims {
            sub: Some(user_id.as_i32()),
            role: Role::User,
            iat: 0,
            exp: 0,
        })
    }

    /// Issue an admin token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] if signing fails.
    pub fn issue_admin(&self) -> Result<String, TokenError> {
        self.issue(Claims {
            sub: None,
            role: Role::Admin,
            iat: 0,
            exp: 0,
        })
    }

    fn issue(&self, mut claims: Claims) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        claims.iat = now;
        claims.exp = now + TOKEN_TTL_SECS;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Invalid)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] past the `exp` claim, and
    /// [`TokenError::Invalid`] for any other failure (bad signature,
    /// malformed token).
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // `sub` is an integer claim here, not the RFC string form
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from("k9#mZ2$vQ8@wR4!nT6^pL1&xB3*cF7(j"))
    }

    #[test]
    fn test_user_token_round_trip() {
        let signer = signer();
        let token = signer.issue_user(UserId::new(42)).unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, Some(42));
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_admin_token_has_no_subject() {
        let signer = signer();
        let token = signer.issue_admin().unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, None);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let signer = signer();
        assert!(matches!(
            signer.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = signer().issue_admin().unwrap();
        let other = TokenSigner::new(&SecretString::from("a8!bC3#dE5$fG7%hJ9^kL2&mN4*pQ6(r"));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }
}

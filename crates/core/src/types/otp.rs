//! One-time password code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OtpCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum OtpError {
    /// The code is not exactly six digits.
    #[error("OTP must be a 6-digit number")]
    Invalid,
}

/// A six-digit one-time password code.
///
/// Comparison is exact string equality; generation lives with the auth
/// service, which owns the randomness source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// Parse an `OtpCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Invalid`] unless the input is exactly six ASCII
    /// digits.
    pub fn parse(s: &str) -> Result<Self, OtpError> {
        if s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(OtpError::Invalid)
        }
    }

    /// Build an `OtpCode` from a number in `100000..=999999`.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Invalid`] if the number is outside the six-digit
    /// range.
    pub fn from_u32(n: u32) -> Result<Self, OtpError> {
        if (100_000..=999_999).contains(&n) {
            Ok(Self(n.to_string()))
        } else {
            Err(OtpError::Invalid)
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OtpCode {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert!(OtpCode::parse("123456").is_ok());
        assert!(OtpCode::parse("12345").is_err());
        assert!(OtpCode::parse("1234567").is_err());
        assert!(OtpCode::parse("12345a").is_err());
    }

    #[test]
    fn test_from_u32_range() {
        assert!(OtpCode::from_u32(100_000).is_ok());
        assert!(OtpCode::from_u32(999_999).is_ok());
        assert!(OtpCode::from_u32(99_999).is_err());
        assert!(OtpCode::from_u32(1_000_000).is_err());
    }

    #[test]
    fn test_exact_match() {
        let issued = OtpCode::from_u32(654_321).unwrap();
        let entered = OtpCode::parse("654321").unwrap();
        assert_eq!(issued, entered);
        assert_ne!(issued, OtpCode::parse("654322").unwrap());
    }
}

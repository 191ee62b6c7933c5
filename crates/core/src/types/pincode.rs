//! Indian postal PIN code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Pincode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PincodeError {
    /// The code is not exactly six digits.
    #[error("enter a valid 6-digit PIN code")]
    InvalidLength,
    /// The code contains a non-digit character.
    #[error("enter a valid 6-digit PIN code")]
    NotDigits,
    /// The code starts with zero, which no PIN code does.
    #[error("enter a valid 6-digit PIN code")]
    LeadingZero,
}

/// An Indian postal PIN code: six digits, first digit nonzero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Pincode(String);

impl Pincode {
    /// Parse a `Pincode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is six digits with a nonzero first
    /// digit.
    pub fn parse(s: &str) -> Result<Self, PincodeError> {
        if s.len() != 6 {
            return Err(PincodeError::InvalidLength);
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PincodeError::NotDigits);
        }

        if s.as_bytes().first() == Some(&b'0') {
            return Err(PincodeError::LeadingZero);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Pincode {
    type Err = PincodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Pincode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        assert!(Pincode::parse("400001").is_ok());
        assert!(Pincode::parse("110092").is_ok());
    }

    #[test]
    fn test_leading_zero() {
        assert!(matches!(
            Pincode::parse("040001"),
            Err(PincodeError::LeadingZero)
        ));
    }

    #[test]
    fn test_wrong_length() {
        assert!(matches!(
            Pincode::parse("4001"),
            Err(PincodeError::InvalidLength)
        ));
    }

    #[test]
    fn test_non_digits() {
        assert!(matches!(
            Pincode::parse("40000a"),
            Err(PincodeError::NotDigits)
        ));
    }
}

//! Indian mobile number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The number is not exactly ten digits.
    #[error("enter a valid Indian mobile number")]
    InvalidLength,
    /// The number contains a non-digit character.
    #[error("enter a valid Indian mobile number")]
    NotDigits,
    /// The number does not start with 6-9.
    #[error("enter a valid Indian mobile number")]
    InvalidPrefix,
}

/// An Indian mobile number: exactly ten digits, first digit 6-9.
///
/// ## Examples
///
/// ```
/// use filigree_core::Phone;
///
/// assert!(Phone::parse("9876543210").is_ok());
/// assert!(Phone::parse("1234567890").is_err()); // bad prefix
/// assert!(Phone::parse("98765").is_err());      // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is ten digits starting with 6-9.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.len() != 10 {
            return Err(PhoneError::InvalidLength);
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NotDigits);
        }

        if !matches!(s.as_bytes().first(), Some(b'6'..=b'9')) {
            return Err(PhoneError::InvalidPrefix);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_prefixes() {
        for prefix in ['6', '7', '8', '9'] {
            let number = format!("{prefix}123456789");
            assert!(Phone::parse(&number).is_ok(), "prefix {prefix} rejected");
        }
    }

    #[test]
    fn test_invalid_prefix() {
        assert!(matches!(
            Phone::parse("5123456789"),
            Err(PhoneError::InvalidPrefix)
        ));
        assert!(matches!(
            Phone::parse("0123456789"),
            Err(PhoneError::InvalidPrefix)
        ));
    }

    #[test]
    fn test_wrong_length() {
        assert!(matches!(
            Phone::parse("987654321"),
            Err(PhoneError::InvalidLength)
        ));
        assert!(matches!(
            Phone::parse("98765432101"),
            Err(PhoneError::InvalidLength)
        ));
    }

    #[test]
    fn test_non_digits() {
        assert!(matches!(
            Phone::parse("98765abcde"),
            Err(PhoneError::NotDigits)
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let phone = Phone::parse("9876543210").unwrap();
        assert_eq!(serde_json::to_string(&phone).unwrap(), "\"9876543210\"");
    }
}

//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use filigree_core::{AddressBook, Email, Gender, JewelleryInterest, Phone, UserId};

/// A storefront user.
///
/// The password hash and any pending OTP live in their own tables and are
/// never part of this type, so serializing a `User` can never leak them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique mobile number.
    pub phone: Phone,
    /// Unique email address.
    pub email: Email,
    /// Whether the account passed OTP verification.
    pub is_verified: bool,
    /// Optional age, 15-120.
    pub age: Option<i32>,
    /// Optional stated gender.
    pub gender: Option<Gender>,
    /// Jewellery categories the shopper cares about.
    pub jewellery_interests: Vec<JewelleryInterest>,
    /// Shipping addresses, owned by this user.
    #[serde(rename = "address")]
    pub addresses: AddressBook,
    /// When the password last changed.
    pub password_changed_at: DateTime<Utc>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

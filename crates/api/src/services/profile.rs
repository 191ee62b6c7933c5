//! Profile updates: in-place fields, password, and address-book actions.
//!
//! The update payload is a typed command: unknown or non-updatable fields
//! (`_id`, `otp`, `isVerified`, timestamps) fail deserialization with a 400
//! instead of being filtered at runtime. Address actions are a tagged enum
//! discriminated by `action`, and all list mutation goes through the
//! `AddressBook` aggregate.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use filigree_core::{
    AddressInput, AddressPatch, Email, Gender, IndianState, JewelleryInterest, Phone, Pincode,
};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::services::auth::{hash_password, validate_name, validate_password};

/// Address fields for an `add` action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: IndianState,
    pub zip: String,
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Address fields for an `update` action; absent fields keep stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatchForm {
    pub full_name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<IndianState>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub is_default: Option<bool>,
}

/// One address-book mutation, discriminated by `action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AddressAction {
    Add {
        #[serde(flatten)]
        address: AddressForm,
    },
    Update {
        #[serde(rename = "_id")]
        id: Uuid,
        #[serde(flatten)]
        patch: AddressPatchForm,
    },
    Delete {
        #[serde(rename = "_id")]
        id: Uuid,
    },
}

/// The profile-update command accepted by `POST /users/user`.
///
/// `deny_unknown_fields` is the allow-list: anything not named here is
/// rejected at the deserialization boundary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub jewellery_interests: Option<Vec<JewelleryInterest>>,
    pub address: Option<AddressAction>,
}

impl UpdateUserRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.gender.is_none()
            && self.age.is_none()
            && self.jewellery_interests.is_none()
            && self.address.is_none()
    }
}

/// Profile service.
pub struct ProfileService<'a> {
    users: UserRepository<'a>,
}

impl<'a> ProfileService<'a> {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Apply a profile-update command to the authenticated user.
    ///
    /// Returns the user as stored after all changes.
    ///
    /// # Errors
    ///
    /// Fails 400 on an empty command or invalid field, 404 on an address
    /// update whose `_id` matches nothing.
    pub async fn update_user(&self, user: &User, request: UpdateUserRequest) -> Result<User> {
        if request.is_empty() {
            return Err(AppError::validation("No update fields provided"));
        }

        if let Some(action) = request.address {
            self.apply_address_action(user, action).await?;
        }

        if let Some(password) = &request.password {
            validate_password(password)?;
            let hash = hash_password(password)?;
            self.users.update_password(user.id, &hash).await?;
        }

        let mut changes = crate::db::users::ProfileChanges::default();
        if let Some(name) = request.name {
            validate_name(&name)?;
            changes.name = Some(name);
        }
        if let Some(phone) = &request.phone {
            changes.phone = Some(Phone::parse(phone)?);
        }
        if let Some(email) = &request.email {
            changes.email = Some(Email::parse(email)?);
        }
        if let Some(age) = request.age {
            if !(15..=120).contains(&age) {
                return Err(AppError::validation("Age must be between 15 and 120"));
            }
            changes.age = Some(age);
        }
        changes.gender = request.gender;
        changes.jewellery_interests = request.jewellery_interests;

        Ok(self.users.update_profile(user.id, &changes).await?)
    }

    /// Run one address-book action and persist the resulting book.
    async fn apply_address_action(&self, user: &User, action: AddressAction) -> Result<()> {
        let mut book = user.addresses.clone();

        match action {
            AddressAction::Add { address } => {
                book.add(AddressInput {
                    full_name: address.full_name,
                    street_address: address.street_address,
                    city: address.city,
                    state: address.state,
                    zip: Pincode::parse(&address.zip)?,
                    phone: Phone::parse(&address.phone)?,
                    is_default: address.is_default,
                })?;
            }
            AddressAction::Update { id, patch } => {
                book.update(
                    id,
                    AddressPatch {
                        full_name: patch.full_name,
                        street_address: patch.street_address,
                        city: patch.city,
                        state: patch.state,
                        zip: patch.zip.as_deref().map(Pincode::parse).transpose()?,
                        phone: patch.phone.as_deref().map(Phone::parse).transpose()?,
                        is_default: patch.is_default,
                    },
                )?;
            }
            AddressAction::Delete { id } => {
                // An unmatched id is deliberately a silent no-op.
                book.remove(id);
            }
        }

        self.users.set_addresses(user.id, &book).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = serde_json::from_str::<UpdateUserRequest>(r#"{"isVerified": true}"#);
        assert!(err.is_err());

        let err = serde_json::from_str::<UpdateUserRequest>(r#"{"otp": "123456"}"#);
        assert!(err.is_err());

        let err = serde_json::from_str::<UpdateUserRequest>(r#"{"_id": 4}"#);
        assert!(err.is_err());

        let err = serde_json::from_str::<UpdateUserRequest>(r#"{"createdAt": "2026-01-01"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_allowed_fields_deserialize() {
        let request: UpdateUserRequest = serde_json::from_str(
            r#"{"name": "Asha Patel", "age": 28, "jewelleryInterests": ["Rings", "Earrings"]}"#,
        )
        .unwrap();
        assert_eq!(request.name.as_deref(), Some("Asha Patel"));
        assert_eq!(request.age, Some(28));
        assert_eq!(
            request.jewellery_interests.unwrap(),
            vec![JewelleryInterest::Rings, JewelleryInterest::Earrings]
        );
    }

    #[test]
    fn test_address_add_action_deserializes() {
        let request: UpdateUserRequest = serde_json::from_str(
            r#"{"address": {"action": "add", "fullName": "Asha Patel",
                "streetAddress": "12 MG Road", "city": "Pune", "state": "Maharashtra",
                "zip": "411001", "phone": "9876543210", "isDefault": true}}"#,
        )
        .unwrap();

        match request.address.unwrap() {
            AddressAction::Add { address } => {
                assert_eq!(address.city, "Pune");
                assert!(address.is_default);
            }
            other => panic!("expected add action, got {other:?}"),
        }
    }

    #[test]
    fn test_address_update_requires_id() {
        let err = serde_json::from_str::<UpdateUserRequest>(
            r#"{"address": {"action": "update", "city": "Mumbai"}}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_address_unknown_action_is_rejected() {
        let err = serde_json::from_str::<UpdateUserRequest>(
            r#"{"address": {"action": "merge", "_id": "4f0c34cc-5f3a-4f0c-9c39-7dbb54bc34b0"}}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_request_detection() {
        let request: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());
    }
}

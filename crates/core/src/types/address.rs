//! Shipping addresses and the per-user address book.
//!
//! Addresses are value objects embedded in the owning user record, not
//! standalone rows. All mutation goes through [`AddressBook`], which owns the
//! "at most one default address" invariant: any mutation that marks an entry
//! as default first clears the flag on every other entry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::phone::Phone;
use crate::types::pincode::Pincode;

/// Errors from address-book mutations.
#[derive(thiserror::Error, Debug, Clone)]
pub enum AddressError {
    /// No address in the book has the given id.
    #[error("address not found")]
    NotFound,
    /// Full name must be letters and spaces only.
    #[error("full name can only contain letters and spaces")]
    InvalidFullName,
    /// City must be letters and spaces only.
    #[error("city can only contain letters and spaces")]
    InvalidCity,
    /// Street address must be non-empty.
    #[error("street address is required")]
    EmptyStreet,
}

/// Indian states and union territories accepted in shipping addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndianState {
    #[serde(rename = "Andhra Pradesh")]
    AndhraPradesh,
    #[serde(rename = "Arunachal Pradesh")]
    ArunachalPradesh,
    Assam,
    Bihar,
    Chhattisgarh,
    Goa,
    Gujarat,
    Haryana,
    #[serde(rename = "Himachal Pradesh")]
    HimachalPradesh,
    Jharkhand,
    Karnataka,
    Kerala,
    #[serde(rename = "Madhya Pradesh")]
    MadhyaPradesh,
    Maharashtra,
    Manipur,
    Meghalaya,
    Mizoram,
    Nagaland,
    Odisha,
    Punjab,
    Rajasthan,
    Sikkim,
    #[serde(rename = "Tamil Nadu")]
    TamilNadu,
    Telangana,
    Tripura,
    #[serde(rename = "Uttar Pradesh")]
    UttarPradesh,
    Uttarakhand,
    #[serde(rename = "West Bengal")]
    WestBengal,
    Delhi,
    #[serde(rename = "Jammu and Kashmir")]
    JammuAndKashmir,
    Ladakh,
}

/// A single shipping address owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Stable identifier for update/delete operations.
    pub id: Uuid,
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: IndianState,
    pub zip: Pincode,
    pub phone: Phone,
    pub is_default: bool,
}

/// Input for adding a new address.
#[derive(Debug, Clone)]
pub struct AddressInput {
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: IndianState,
    pub zip: Pincode,
    pub phone: Phone,
    pub is_default: bool,
}

/// Partial input for updating an existing address.
///
/// `None` fields keep the stored value; `Some` fields win.
#[derive(Debug, Clone, Default)]
pub struct AddressPatch {
    pub full_name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<IndianState>,
    pub zip: Option<Pincode>,
    pub phone: Option<Phone>,
    pub is_default: Option<bool>,
}

/// A user's list of shipping addresses.
///
/// The book does not require a default address to exist, and it does not stop
/// the caller from deleting the last address; it only guarantees that after
/// any single mutation at most one entry has `is_default` set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AddressBook(Vec<Address>);

impl AddressBook {
    /// Create an empty address book.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the book has no addresses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the addresses in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }

    /// The current default address, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.0.iter().find(|a| a.is_default)
    }

    /// Look up an address by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Address> {
        self.0.iter().find(|a| a.id == id)
    }

    /// Add a new address, assigning it a fresh id.
    ///
    /// If the input is marked default, every existing entry loses its default
    /// flag first.
    ///
    /// # Errors
    ///
    /// Returns an error if the name, city, or street fail validation.
    pub fn add(&mut self, input: AddressInput) -> Result<&Address, AddressError> {
        validate_letters_and_spaces(&input.full_name).ok_or(AddressError::InvalidFullName)?;
        validate_letters_and_spaces(&input.city).ok_or(AddressError::InvalidCity)?;
        if input.street_address.trim().is_empty() {
            return Err(AddressError::EmptyStreet);
        }

        if input.is_default {
            self.clear_default();
        }

        self.0.push(Address {
            id: Uuid::new_v4(),
            full_name: input.full_name,
            street_address: input.street_address,
            city: input.city,
            state: input.state,
            zip: input.zip,
            phone: input.phone,
            is_default: input.is_default,
        });

        // Just pushed, so last() is the new entry.
        self.0.last().ok_or(AddressError::NotFound)
    }

    /// Merge a patch into the address with the given id.
    ///
    /// Patched fields win over stored fields. If the patch sets the default
    /// flag, every other entry loses it first.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotFound`] if no entry matches `id`, or a
    /// validation error if a patched name/city/street is invalid.
    pub fn update(&mut self, id: Uuid, patch: AddressPatch) -> Result<&Address, AddressError> {
        if let Some(name) = &patch.full_name {
            validate_letters_and_spaces(name).ok_or(AddressError::InvalidFullName)?;
        }
        if let Some(city) = &patch.city {
            validate_letters_and_spaces(city).ok_or(AddressError::InvalidCity)?;
        }
        if let Some(street) = &patch.street_address
            && street.trim().is_empty()
        {
            return Err(AddressError::EmptyStreet);
        }

        let position = self
            .0
            .iter()
            .position(|a| a.id == id)
            .ok_or(AddressError::NotFound)?;

        if patch.is_default == Some(true) {
            self.clear_default();
        }

        let entry = self.0.get_mut(position).ok_or(AddressError::NotFound)?;
        if let Some(v) = patch.full_name {
            entry.full_name = v;
        }
        if let Some(v) = patch.street_address {
            entry.street_address = v;
        }
        if let Some(v) = patch.city {
            entry.city = v;
        }
        if let Some(v) = patch.state {
            entry.state = v;
        }
        if let Some(v) = patch.zip {
            entry.zip = v;
        }
        if let Some(v) = patch.phone {
            entry.phone = v;
        }
        if let Some(v) = patch.is_default {
            entry.is_default = v;
        }

        self.0.get(position).ok_or(AddressError::NotFound)
    }

    /// Remove the address with the given id.
    ///
    /// Returns whether anything was removed; an unmatched id is not an error
    /// here, the caller decides whether to surface it.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.0.len();
        self.0.retain(|a| a.id != id);
        self.0.len() != before
    }

    fn clear_default(&mut self) {
        for address in &mut self.0 {
            address.is_default = false;
        }
    }
}

impl<'a> IntoIterator for &'a AddressBook {
    type Item = &'a Address;
    type IntoIter = std::slice::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// `Some(())` when the input is non-empty letters and spaces.
fn validate_letters_and_spaces(s: &str) -> Option<()> {
    (!s.trim().is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')).then_some(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_input(is_default: bool) -> AddressInput {
        AddressInput {
            full_name: "Asha Patel".to_owned(),
            street_address: "12 MG Road".to_owned(),
            city: "Pune".to_owned(),
            state: IndianState::Maharashtra,
            zip: Pincode::parse("411001").unwrap(),
            phone: Phone::parse("9876543210").unwrap(),
            is_default,
        }
    }

    fn default_count(book: &AddressBook) -> usize {
        book.iter().filter(|a| a.is_default).count()
    }

    #[test]
    fn test_add_assigns_distinct_ids() {
        let mut book = AddressBook::new();
        let first = book.add(sample_input(false)).unwrap().id;
        let second = book.add(sample_input(false)).unwrap().id;
        assert_ne!(first, second);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_add_default_unsets_previous_default() {
        let mut book = AddressBook::new();
        book.add(sample_input(true)).unwrap();
        book.add(sample_input(true)).unwrap();
        book.add(sample_input(true)).unwrap();

        assert_eq!(default_count(&book), 1);
        let last_id = book.iter().last().unwrap().id;
        assert_eq!(book.default_address().unwrap().id, last_id);
    }

    #[test]
    fn test_update_merges_and_moves_default() {
        let mut book = AddressBook::new();
        let first = book.add(sample_input(true)).unwrap().id;
        let second = book.add(sample_input(false)).unwrap().id;

        let updated = book
            .update(
                second,
                AddressPatch {
                    city: Some("Mumbai".to_owned()),
                    is_default: Some(true),
                    ..AddressPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.city, "Mumbai");
        // Unpatched fields survive the merge.
        assert_eq!(updated.full_name, "Asha Patel");
        assert!(updated.is_default);
        assert_eq!(default_count(&book), 1);
        assert!(!book.get(first).unwrap().is_default);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let mut book = AddressBook::new();
        book.add(sample_input(false)).unwrap();
        let result = book.update(Uuid::new_v4(), AddressPatch::default());
        assert!(matches!(result, Err(AddressError::NotFound)));
    }

    #[test]
    fn test_remove_reports_whether_matched() {
        let mut book = AddressBook::new();
        let id = book.add(sample_input(false)).unwrap().id;
        assert!(book.remove(id));
        assert!(!book.remove(id));
        assert!(book.is_empty());
    }

    #[test]
    fn test_validation_rejects_bad_name_and_city() {
        let mut book = AddressBook::new();

        let mut bad_name = sample_input(false);
        bad_name.full_name = "Asha 2nd".to_owned();
        assert!(matches!(
            book.add(bad_name),
            Err(AddressError::InvalidFullName)
        ));

        let mut bad_city = sample_input(false);
        bad_city.city = "Pune-411".to_owned();
        assert!(matches!(book.add(bad_city), Err(AddressError::InvalidCity)));

        assert!(book.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut book = AddressBook::new();
        book.add(sample_input(true)).unwrap();
        let json = serde_json::to_string(&book).unwrap();
        let back: AddressBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn test_state_serde_uses_display_names() {
        let json = serde_json::to_string(&IndianState::TamilNadu).unwrap();
        assert_eq!(json, "\"Tamil Nadu\"");
    }
}

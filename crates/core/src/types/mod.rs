//! Core types for Filigree.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod catalog;
pub mod email;
pub mod id;
pub mod otp;
pub mod phone;
pub mod pincode;
pub mod status;

pub use address::{Address, AddressBook, AddressError, AddressInput, AddressPatch, IndianState};
pub use catalog::*;
pub use email::{Email, EmailError};
pub use id::*;
pub use otp::{OtpCode, OtpError};
pub use phone::{Phone, PhoneError};
pub use pincode::{Pincode, PincodeError};
pub use status::*;

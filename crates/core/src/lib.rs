//! Filigree Core - Shared types library.
//!
//! This crate provides common types used across all Filigree components:
//! - `api` - REST backend for the storefront and admin surface
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and validated values
//!   (email, phone, PIN code, OTP code), closed catalog enums, and the
//!   address-book aggregate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

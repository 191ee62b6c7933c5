//! Domain models for the API.
//!
//! These are validated domain objects, separate from database row types.
//! Everything here serializes with camelCase keys, which is the wire casing
//! of the public API.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine, CartView, PopulatedCartItem};
pub use order::{Order, OrderItem, PaymentInfo, ShippingInfo};
pub use product::Product;
pub use user::User;

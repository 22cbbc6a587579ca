//! Storefront records shared by the server and the client mirror.
//!
//! - `user`: customers keyed by email, with re-registration merge rules
//! - `order`: shopping-cart orders and their newest-first ordering
//!
//! Everything serializes with camelCase keys, which is also the on-disk format.

pub mod errors;
pub mod order;
pub mod user;

pub use errors::ModelError;
pub use order::{CreateOrderInput, LineItem, Order};
pub use user::{RegisterUserInput, Upsert, User};

//! Service layer for the storefront backend.
//! - `storage`: the file-backed record store (one JSON array per record kind)
//! - `user_service` / `order_service`: the operations exposed over HTTP
//! - `observability`: prometheus counters for registrations, orders and store fallbacks

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod observability;
pub mod user_service;
pub mod order_service;

pub use errors::ServiceError;
pub use order_service::OrderService;
pub use storage::record_store::{Collection, Record, RecordKind, RecordStore};
pub use user_service::UserService;

//! Storage for the service layer.
//!
//! Whole collections are read and rewritten as JSON arrays; there is no index.

pub mod record_store;

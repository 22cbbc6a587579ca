//! Client-side mirror of the storefront backend.
//!
//! [`OrderMirror`] answers each operation from an ordered list of tiers: the
//! HTTP backend first, then a local key-value copy. Records created remotely
//! can be cached into the local copy. The two copies are never reconciled.

pub mod errors;
pub mod local;
pub mod mirror;
pub mod policy;
pub mod remote;

pub use errors::ClientError;
pub use local::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use mirror::{OrderMirror, Resolved};
pub use policy::{MergePolicy, ResolutionPolicy, Tier};
pub use remote::{HttpBackend, RemoteBackend};

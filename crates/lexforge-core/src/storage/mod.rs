//! Storage bridge carrying in-flight state across the sign-in redirect.
//!
//! Two scopes exist, mirroring browser storage: a session scope that dies
//! with the session, and a persistent scope that survives it. The redirect
//! keys are written to both; the session copy is primary.

mod bridge;
pub mod keys;
mod store;

pub use bridge::{DraftPointer, StorageBridge, StorageScope};
pub use store::{KeyValueStore, MemoryStore};

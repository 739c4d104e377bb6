//! OTV Store - Persisted Backend State
//!
//! Document storage for the validator program backend. The [`Store`]
//! trait defines the per-record find-and-update contracts every job
//! relies on; [`SledStore`] is the embedded persistent backend and
//! [`MemoryStore`] the in-memory one used by tests and development.

pub mod error;
pub mod memory;
pub mod sled;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use self::sled::SledStore;
pub use store::Store;

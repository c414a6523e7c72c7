#![forbid(unsafe_code)]

pub mod sqlite;
pub mod store;

pub use sqlite::{SqliteInitError, SqliteStore};
pub use store::{KeyValueStore, MemoryStore, NamespacedStore, StoreError, STORE_PREFIX};

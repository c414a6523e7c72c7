use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::warn;

/// Namespace prefix shared by every key the site persists.
pub const STORE_PREFIX: &str = "circle8_";

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable string key-value persistence, scoped to one browsing origin.
///
/// The contract mirrors `localStorage`: plain string values, upsert on put,
/// absent keys read back as `None`. Concurrent writers race last-writer-wins;
/// callers are assumed to live in a single browsing session.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be reached.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value cannot be stored.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be reached.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory backend for tests and prototyping.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Namespacing and JSON codec layered over any backend.
///
/// Reads are tolerant by design: an unreachable backend or a corrupt stored
/// value reads back as "absent" (with a warning) so a page never fails to
/// load over bad persisted state. Writes still report their errors; callers
/// that must not fail drop them explicitly.
#[derive(Clone)]
pub struct NamespacedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl NamespacedStore {
    /// Wrap a backend under the site-wide `circle8_` prefix.
    #[must_use]
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self::with_prefix(inner, STORE_PREFIX)
    }

    #[must_use]
    pub fn with_prefix(inner: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Read a plain string value; backend failures read as absent.
    pub async fn get_string(&self, key: &str) -> Option<String> {
        match self.inner.get(&self.scoped(key)).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "storage read failed, treating as absent");
                None
            }
        }
    }

    /// Write a plain string value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend rejects the write.
    pub async fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.put(&self.scoped(key), value).await
    }

    /// Read and decode a JSON value; corrupt or absent entries read as `None`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_string(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "corrupt stored JSON, treating as absent");
                None
            }
        }
    }

    /// Encode and write a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if encoding fails or the backend rejects the
    /// write.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.put_string(key, &raw).await
    }

    /// Remove a key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be reached.
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.scoped(key)).await
    }
}

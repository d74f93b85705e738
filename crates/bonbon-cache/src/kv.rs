//! Durable client storage with automatic serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};

use crate::CacheError;

/// Durable client storage, addressed by string keys.
///
/// Models browser-style local storage: string values, last-writer-wins,
/// no transactions. Each store component owns a disjoint namespace and
/// never reads another component's keys.
pub trait StorageBackend: Send + Sync {
    /// Load the raw value for a key, if present.
    fn load(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a raw value under a key, replacing any previous value.
    fn store(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// In-memory [`StorageBackend`] for native targets and tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries().get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Namespaced, JSON-serializing view over a [`StorageBackend`].
///
/// # Example
///
/// ```rust,ignore
/// let store = KvStore::new(backend, "bonbon.session");
/// store.set("session", &session)?;
/// let session: Option<PersistedSession> = store.get("session")?;
/// ```
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<dyn StorageBackend>,
    namespace: String,
}

impl KvStore {
    /// Create a store scoped to `namespace`.
    pub fn new(backend: Arc<dyn StorageBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    /// The namespace this store prefixes every key with.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get a value, deserializing it from JSON.
    ///
    /// Returns `None` if the key does not exist. A value that exists but
    /// fails to parse surfaces as [`CacheError::Serialize`]; callers decide
    /// how to degrade.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.load(&self.scoped(key))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Set a value, serializing it to JSON.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.backend.store(&self.scoped(key), &raw)
    }

    /// Delete a value.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.backend.remove(&self.scoped(key))
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

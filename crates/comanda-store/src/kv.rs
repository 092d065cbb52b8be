//! # Key-Value Store
//!
//! The persistence contract the order archive is written against: string
//! keys, string values, nothing else.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KeyValueStore (trait)                                                  │
//! │  ├── get(key) -> Option<String>                                         │
//! │  └── set(key, value)                                                    │
//! │                                                                         │
//! │  Implementations                                                        │
//! │  ├── SqliteKvStore  (repository::kv)   table kv_store                   │
//! │  └── MemoryStore    (this module)      HashMap, tests and dry runs      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};

/// A persistent string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` if nothing was stored.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory store. Writes can be switched to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("orders").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_replaces_value() {
        let store = MemoryStore::new();
        store.set("orders", "[]").await.unwrap();
        store.set("orders", "[1]").await.unwrap();

        assert_eq!(store.get("orders").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_fail_writes() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(matches!(
            store.set("orders", "[]").await,
            Err(StoreError::WriteRejected { .. })
        ));

        store.set_fail_writes(false);
        assert!(store.set("orders", "[]").await.is_ok());
    }

    #[tokio::test]
    async fn test_shared_through_arc() {
        let store = Arc::new(MemoryStore::new());
        let handle: Arc<dyn KeyValueStore> = store.clone();

        handle.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}

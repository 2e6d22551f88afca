//! In-Memory Store Backend
//!
//! Mirrors the external store's primitive semantics in-process: lazy TTL
//! expiry, create-at-zero counters, type errors on non-integer increments.
//! Used by the test suite and by hosts that want the cache actions without
//! a running server.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::store::StoreBackend;

// == Memory Entry ==
#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn new(value: String, expire: Option<u64>) -> Self {
        Self {
            value,
            expires_at: expire.map(|secs| Instant::now() + Duration::from_secs(secs)),
        }
    }

    /// An entry is expired once the current time reaches its deadline.
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

// == Memory Store ==
/// In-process [`StoreBackend`] with lazy expiry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of live entries. Test helper.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, value: &str, expire: Option<u64>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), MemoryEntry::new(value.to_string(), expire));
        Ok(())
    }

    async fn write_if_absent(&self, key: &str, value: &str, expire: Option<u64>) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let occupied = entries.get(key).map(|e| !e.is_expired()).unwrap_or(false);
        if occupied {
            return Ok(false);
        }
        entries.insert(key.to_string(), MemoryEntry::new(value.to_string(), expire));
        Ok(true)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut entries = self.entries.write().await;
        let (current, expires_at) = match entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let parsed = entry.value.trim().parse::<i64>().map_err(|_| {
                    redis::RedisError::from((
                        redis::ErrorKind::TypeError,
                        "value is not an integer or out of range",
                    ))
                })?;
                (parsed, entry.expires_at)
            }
            // Absent or expired keys start from zero, as the server does
            _ => (0, None),
        };
        let value = current.checked_add(delta).ok_or_else(|| {
            redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "increment or decrement would overflow",
            ))
        })?;
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(value)
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<()> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(Instant::now() + Duration::from_secs(seconds));
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[tokio::test]
    async fn test_write_and_read() {
        let store = MemoryStore::new();
        store.write("k", "v", None).await.unwrap();
        assert_eq!(store.read("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_read_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.read("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_if_absent_second_write_loses() {
        let store = MemoryStore::new();
        assert!(store.write_if_absent("k", "first", None).await.unwrap());
        assert!(!store.write_if_absent("k", "second", None).await.unwrap());
        assert_eq!(store.read("k").await.unwrap(), Some("first".to_string()));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemoryStore::new();
        store.write("k", "v", None).await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_incr_by_creates_at_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.incr_by("counter", 5).await.unwrap(), 5);
        assert_eq!(store.incr_by("counter", -2).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_incr_by_non_integer_is_type_error() {
        let store = MemoryStore::new();
        store.write("k", "\"text\"", None).await.unwrap();
        let err = store.incr_by("k", 1).await.unwrap_err();
        assert!(matches!(err, CacheError::Store(_)));
    }

    #[tokio::test]
    async fn test_incr_by_preserves_ttl() {
        let store = MemoryStore::new();
        store.write("counter", "1", Some(60)).await.unwrap();
        store.incr_by("counter", 1).await.unwrap();
        let entries = store.entries.read().await;
        assert!(entries.get("counter").unwrap().expires_at.is_some());
    }

    #[tokio::test]
    async fn test_lazy_expiry() {
        let store = MemoryStore::new();
        store.write("k", "v", Some(1)).await.unwrap();
        assert_eq!(store.read("k").await.unwrap(), Some("v".to_string()));

        // Wait for expiration
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.read("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flush_removes_everything() {
        let store = MemoryStore::new();
        store.write("a", "1", None).await.unwrap();
        store.write("b", "2", None).await.unwrap();
        store.flush().await.unwrap();
        assert!(store.is_empty().await);
    }
}

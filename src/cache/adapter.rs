//! Cache Adapter Module
//!
//! Stateless translator between the logical cache contract and store
//! primitives. Every operation is one or two calls against the backend;
//! the store itself carries all persistent state and the adapter never
//! caches entries locally.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::store::{RedisStore, StoreBackend};

// == Cache Adapter ==
/// Cache operations over a [`StoreBackend`].
///
/// Owns its backend explicitly; construct one per store connection and
/// share it behind an `Arc` rather than through a process-wide singleton.
pub struct CacheAdapter<S: StoreBackend> {
    store: S,
    config: CacheConfig,
}

impl CacheAdapter<RedisStore> {
    /// Connects to the external store described by `config`.
    pub async fn connect(config: CacheConfig) -> Result<Self> {
        let store = RedisStore::connect(&config).await?;
        Ok(Self::with_store(store, config))
    }
}

impl<S: StoreBackend> CacheAdapter<S> {
    /// Creates an adapter over an already-constructed backend.
    pub fn with_store(store: S, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// Borrow of the underlying backend, for callers that need the native
    /// store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configuration this adapter was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn encode(key: &str, value: &Value) -> Result<String> {
        serde_json::to_string(value).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            source,
        })
    }

    // == Set ==
    /// Stores `value` at `key`, JSON-encoded, overwriting unconditionally.
    ///
    /// The write carries a TTL when `expire` is given or auto-expiry is
    /// configured.
    pub async fn set(&self, key: &str, value: &Value, expire: Option<u64>) -> Result<()> {
        let raw = Self::encode(key, value)?;
        self.store
            .write(key, &raw, self.config.expire_for(expire))
            .await?;
        debug!(key, "set");
        Ok(())
    }

    // == Get ==
    /// Retrieves and JSON-decodes the value at `key`.
    ///
    /// Returns `Ok(None)` when the key is absent; absence is not an error.
    /// A stored value that fails to decode is reported as [`CacheError::Decode`],
    /// distinct from transport failure.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let Some(raw) = self.store.read(key).await? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).map_err(|source| {
            warn!(key, "stored value is not valid JSON");
            CacheError::Decode {
                key: key.to_string(),
                source,
            }
        })?;
        Ok(Some(value))
    }

    // == Add ==
    /// Stores `value` at `key` only if the key is absent.
    ///
    /// A single atomic conditional set on the store, so two racing adds on
    /// the same absent key cannot both win. Fails with
    /// [`CacheError::KeyExists`] when the key already holds a value.
    pub async fn add(&self, key: &str, value: &Value, expire: Option<u64>) -> Result<()> {
        let raw = Self::encode(key, value)?;
        let written = self
            .store
            .write_if_absent(key, &raw, self.config.expire_for(expire))
            .await?;
        if !written {
            return Err(CacheError::KeyExists(key.to_string()));
        }
        debug!(key, "add");
        Ok(())
    }

    // == Delete ==
    /// Removes `key`. Idempotent; succeeds whether or not the key existed.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key).await?;
        debug!(key, "delete");
        Ok(())
    }

    // == Incr / Decr ==
    /// Increments the integer at `key` by `amount`.
    ///
    /// Returns `Ok(None)` when the key is absent (nothing to increment).
    /// Fails with [`CacheError::NotANumber`] when the stored value does not
    /// parse as a base-10 integer.
    pub async fn incr(&self, key: &str, amount: i64) -> Result<Option<i64>> {
        self.apply_counter("incr", key, amount).await
    }

    /// Decrements the integer at `key` by `amount`. Same contract as
    /// [`CacheAdapter::incr`].
    pub async fn decr(&self, key: &str, amount: i64) -> Result<Option<i64>> {
        self.apply_counter("decr", key, amount.saturating_neg()).await
    }

    /// Shared incr/decr path.
    ///
    /// The read is validation only: absent keys short-circuit to None and
    /// non-integer values fail loudly. The arithmetic itself is the store's
    /// atomic increment, so concurrent counters never lose updates; the
    /// validation read can still race with a concurrent delete or rewrite.
    async fn apply_counter(&self, op: &'static str, key: &str, delta: i64) -> Result<Option<i64>> {
        let Some(raw) = self.store.read(key).await? else {
            return Ok(None);
        };
        raw.trim()
            .parse::<i64>()
            .map_err(|_| CacheError::NotANumber {
                op,
                key: key.to_string(),
            })?;

        let value = self.store.incr_by(key, delta).await?;

        // Heuristic: counters that land on zero get the auto-expire window
        // re-applied so long-lived zeroed counters eventually evict.
        if value == 0 {
            if let Some(seconds) = self.config.expire_for(None) {
                self.store.expire(key, seconds).await?;
            }
        }

        debug!(key, value, "{}", op);
        Ok(Some(value))
    }

    // == Clear ==
    /// Wipes the store's entire active logical database.
    ///
    /// This is a global, destructive flush affecting every key in the
    /// target database, not just keys written through this adapter.
    pub async fn clear(&self) -> Result<()> {
        self.store.flush().await?;
        debug!("clear");
        Ok(())
    }

    // == Close ==
    /// Releases the store connection, best effort.
    ///
    /// Errors are surfaced so the caller can log them; teardown should
    /// proceed regardless.
    pub async fn close(&self) -> Result<()> {
        self.store.close().await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn test_adapter() -> CacheAdapter<MemoryStore> {
        CacheAdapter::with_store(MemoryStore::new(), CacheConfig::default())
    }

    fn auto_expire_adapter(seconds: u64) -> CacheAdapter<MemoryStore> {
        CacheAdapter::with_store(
            MemoryStore::new(),
            CacheConfig::default().with_auto_expire(seconds),
        )
    }

    #[tokio::test]
    async fn test_set_and_get_roundtrip() {
        let adapter = test_adapter();
        let value = json!({"name": "widget", "count": 3});

        adapter.set("item", &value, None).await.unwrap();
        assert_eq!(adapter.get("item").await.unwrap(), Some(value));
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let adapter = test_adapter();
        assert_eq!(adapter.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let adapter = test_adapter();
        adapter.set("k", &json!("one"), None).await.unwrap();
        adapter.set("k", &json!("two"), None).await.unwrap();
        assert_eq!(adapter.get("k").await.unwrap(), Some(json!("two")));
    }

    #[tokio::test]
    async fn test_get_decode_error_is_distinct() {
        let adapter = test_adapter();
        // Bypass the adapter to plant a corrupt value
        adapter.store().write("bad", "{not json", None).await.unwrap();

        let err = adapter.get("bad").await.unwrap_err();
        assert!(matches!(err, CacheError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_add_fails_on_existing_key_and_keeps_first_value() {
        let adapter = test_adapter();
        adapter.add("y", &json!(1), None).await.unwrap();

        let err = adapter.add("y", &json!("other"), None).await.unwrap_err();
        assert!(matches!(err, CacheError::KeyExists(ref k) if k == "y"));
        assert_eq!(adapter.get("y").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let adapter = test_adapter();
        adapter.set("k", &json!("v"), None).await.unwrap();
        adapter.delete("k").await.unwrap();
        adapter.delete("k").await.unwrap();
        assert_eq!(adapter.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_incr_absent_key_returns_none() {
        let adapter = test_adapter();
        assert_eq!(adapter.incr("counter", 1).await.unwrap(), None);
        assert_eq!(adapter.decr("counter", 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_incr_and_decr() {
        let adapter = test_adapter();
        adapter.set("y", &json!(1), None).await.unwrap();

        assert_eq!(adapter.incr("y", 1).await.unwrap(), Some(2));
        assert_eq!(adapter.incr("y", 4).await.unwrap(), Some(6));
        assert_eq!(adapter.decr("y", 3).await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_incr_non_integer_fails_loudly() {
        let adapter = test_adapter();
        adapter.set("k", &json!("text"), None).await.unwrap();

        let err = adapter.incr("k", 1).await.unwrap_err();
        assert!(matches!(
            err,
            CacheError::NotANumber { op: "incr", ref key } if key == "k"
        ));

        let err = adapter.decr("k", 1).await.unwrap_err();
        assert!(matches!(err, CacheError::NotANumber { op: "decr", .. }));
    }

    #[tokio::test]
    async fn test_decr_to_zero_reapplies_auto_expire() {
        let adapter = auto_expire_adapter(1);
        adapter.set("counter", &json!(1), Some(3600)).await.unwrap();

        assert_eq!(adapter.decr("counter", 1).await.unwrap(), Some(0));

        // The zeroed counter now carries the short auto-expire window
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        assert_eq!(adapter.get("counter").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_decr_to_zero_without_auto_expire_keeps_value() {
        let adapter = test_adapter();
        adapter.set("counter", &json!(1), None).await.unwrap();

        assert_eq!(adapter.decr("counter", 1).await.unwrap(), Some(0));
        assert_eq!(adapter.get("counter").await.unwrap(), Some(json!(0)));
    }

    #[tokio::test]
    async fn test_auto_expire_applies_to_writes() {
        let adapter = auto_expire_adapter(1);
        adapter.set("k", &json!("v"), None).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        assert_eq!(adapter.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_explicit_expire_beats_auto_expire() {
        let adapter = auto_expire_adapter(1);
        adapter.set("k", &json!("v"), Some(3600)).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        assert_eq!(adapter.get("k").await.unwrap(), Some(json!("v")));
    }

    #[tokio::test]
    async fn test_clear_wipes_everything() {
        let adapter = test_adapter();
        adapter.set("a", &json!(1), None).await.unwrap();
        adapter.set("b", &json!(2), None).await.unwrap();

        adapter.clear().await.unwrap();

        assert_eq!(adapter.get("a").await.unwrap(), None);
        assert_eq!(adapter.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_close_succeeds() {
        let adapter = test_adapter();
        adapter.close().await.unwrap();
    }
}

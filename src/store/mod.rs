//! Store Backend Module
//!
//! The primitive surface the adapter composes its operations from. The
//! production backend talks to an external Redis-compatible server; the
//! in-memory backend mirrors the same semantics for tests and for hosts
//! that want the action surface without a server.

mod memory;
mod redis_store;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

// == Store Backend Trait ==
/// Primitive key-value operations against the external store.
///
/// All persistent state lives behind this trait; the adapter never caches
/// entries locally. Raw values are opaque strings here; JSON coding is the
/// adapter's concern. Atomicity of each single method call is whatever the
/// backing store guarantees for the matching primitive.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Reads the raw value at `key`, or None if absent.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` at `key` unconditionally, with an optional TTL in
    /// seconds.
    async fn write(&self, key: &str, value: &str, expire: Option<u64>) -> Result<()>;

    /// Writes `value` at `key` only if the key is absent, with an optional
    /// TTL in seconds. Returns true if the write happened. A single atomic
    /// conditional set; no check-then-write race.
    async fn write_if_absent(&self, key: &str, value: &str, expire: Option<u64>) -> Result<bool>;

    /// Removes `key`. Succeeds whether or not the key existed.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Atomically adds `delta` to the integer at `key`, creating it at zero
    /// if absent, and returns the new value. Preserves any existing TTL.
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64>;

    /// Applies a TTL of `seconds` to an existing key.
    async fn expire(&self, key: &str, seconds: u64) -> Result<()>;

    /// Wipes every key in the active logical database. Destructive.
    async fn flush(&self) -> Result<()>;

    /// Releases the store connection, best effort.
    async fn close(&self) -> Result<()>;
}

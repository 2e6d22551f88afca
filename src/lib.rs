//! Redis Cache Plugin - cache actions over an external key-value store
//!
//! Exposes the cache contract (`set`, `get`, `add`, `delete`, `incr`,
//! `decr`, `clear`, `close`) as typed message-handler actions, delegating
//! all storage to a Redis-compatible server. Values are JSON-encoded; an
//! optional auto-expire policy applies a default TTL to writes.

pub mod actions;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use actions::{CacheAction, PluginState, TeardownStack, PLUGIN_NAME, ROLE};
pub use cache::CacheAdapter;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use store::{MemoryStore, RedisStore, StoreBackend};

//! Configuration Module
//!
//! Handles loading and managing store connection settings from environment
//! variables, with caller overrides merged onto defaults.

use std::env;

/// Cache plugin configuration.
///
/// All values can be configured via environment variables with sensible
/// defaults. Immutable after construction; anything beyond these fields
/// (timeouts, reconnect policy) is delegated to the store client.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Store host
    pub host: String,
    /// Store port
    pub port: u16,
    /// Logical database index
    pub db: i64,
    /// Optional username for ACL-enabled servers
    pub username: Option<String>,
    /// Optional password
    pub password: Option<String>,
    /// Default time-to-live in seconds applied to writes without an
    /// explicit expiry. 0 disables auto-expiry.
    pub auto_expire: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_REDIS_HOST` - Store host (default: 127.0.0.1)
    /// - `CACHE_REDIS_PORT` - Store port (default: 6379)
    /// - `CACHE_REDIS_DB` - Logical database index (default: 0)
    /// - `CACHE_REDIS_USERNAME` - Username (default: none)
    /// - `CACHE_REDIS_PASSWORD` - Password (default: none)
    /// - `CACHE_AUTO_EXPIRE` - Default TTL in seconds, 0 = disabled (default: 0)
    pub fn from_env() -> Self {
        Self {
            host: env::var("CACHE_REDIS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("CACHE_REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6379),
            db: env::var("CACHE_REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            username: env::var("CACHE_REDIS_USERNAME").ok(),
            password: env::var("CACHE_REDIS_PASSWORD").ok(),
            auto_expire: env::var("CACHE_AUTO_EXPIRE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Overrides the store address.
    pub fn with_addr(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Overrides the default auto-expire window (seconds, 0 = disabled).
    pub fn with_auto_expire(mut self, seconds: u64) -> Self {
        self.auto_expire = seconds;
        self
    }

    /// Resolves the effective expiry for a write.
    ///
    /// An explicit per-call expiry greater than zero wins; otherwise the
    /// configured auto-expire applies when enabled; otherwise no TTL.
    pub fn expire_for(&self, explicit: Option<u64>) -> Option<u64> {
        explicit
            .filter(|secs| *secs > 0)
            .or_else(|| (self.auto_expire > 0).then_some(self.auto_expire))
    }

    /// Builds the store client connection info from this configuration.
    pub fn connection_info(&self) -> redis::ConnectionInfo {
        redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: redis::RedisConnectionInfo {
                db: self.db,
                username: self.username.clone(),
                password: self.password.clone(),
            },
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            db: 0,
            username: None,
            password: None,
            auto_expire: 0,
        }
    }
}

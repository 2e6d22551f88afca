//! Redis Store Backend
//!
//! Implements [`StoreBackend`] over a single shared `ConnectionManager`.
//! The manager multiplexes all concurrent callers onto one connection and
//! reconnects on failure; retry/backoff beyond that is deliberately not
//! handled here.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::store::StoreBackend;

// == Redis Store ==
/// Production backend over an external Redis-compatible server.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to the server described by `config`.
    ///
    /// The returned store holds an auto-reconnecting managed connection;
    /// cloning the store shares it.
    pub async fn connect(config: &CacheConfig) -> Result<Self> {
        let client = redis::Client::open(config.connection_info())?;
        let conn = client.get_connection_manager().await?;
        debug!(host = %config.host, port = config.port, db = config.db, "connected to store");
        Ok(Self { conn })
    }

    /// Returns a clone of the underlying managed connection.
    ///
    /// This is the opaque native handle for callers that need to issue
    /// commands outside the cache contract.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl StoreBackend for RedisStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn write(&self, key: &str, value: &str, expire: Option<u64>) -> Result<()> {
        let mut conn = self.conn.clone();
        match expire {
            Some(seconds) => {
                let _: () = conn.set_ex(key, value, seconds).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn write_if_absent(&self, key: &str, value: &str, expire: Option<u64>) -> Result<bool> {
        // SET .. NX [EX n] in one round trip; the server replies Nil when
        // the key already holds a value.
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX");
        if let Some(seconds) = expire {
            cmd.arg("EX").arg(seconds);
        }
        let reply: redis::Value = cmd.query_async(&mut conn).await?;
        Ok(!matches!(reply, redis::Value::Nil))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = conn.incr(key, delta).await?;
        Ok(value)
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.expire(key, seconds as i64).await?;
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("QUIT").query_async(&mut conn).await?;
        Ok(())
    }
}

//! Response DTOs for the cache action surface
//!
//! Defines the structure of outgoing reply bodies. Shapes follow the
//! operation contract: key-echo replies for writes, value replies for
//! reads and counters.

use serde::Serialize;
use serde_json::Value;

use crate::error::CacheError;

/// Reply body for the SET operation.
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// The key that was written
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Reply body for the ADD operation.
#[derive(Debug, Clone, Serialize)]
pub struct AddResponse {
    /// The key that was written
    pub key: String,
}

impl AddResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Reply body for the DELETE operation.
///
/// Returned whether or not the key existed; delete is idempotent.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key that was removed
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Reply body for the GET operation.
///
/// `value` is JSON null when the key is absent; absence is not an error.
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The decoded value, or null if the key was absent
    pub value: Value,
}

impl GetResponse {
    pub fn new(value: Option<Value>) -> Self {
        Self {
            value: value.unwrap_or(Value::Null),
        }
    }
}

/// Reply body for the INCR and DECR operations.
///
/// `value` is the new counter value, or null when the key was absent
/// (nothing to increment).
#[derive(Debug, Clone, Serialize)]
pub struct CounterResponse {
    /// The counter value after the operation
    pub value: Option<i64>,
}

impl CounterResponse {
    pub fn new(value: Option<i64>) -> Self {
        Self { value }
    }
}

/// Error reply body for all failure conditions.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code
    pub code: String,
    /// Human-readable description of what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}

impl From<&CacheError> for ErrorResponse {
    fn from(err: &CacheError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

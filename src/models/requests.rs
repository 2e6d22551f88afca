//! Request DTOs for the cache action surface
//!
//! Defines the structure of incoming action message bodies. Each operation
//! gets its own request type, validated at the boundary before it reaches
//! the adapter.

use serde::Deserialize;
use serde_json::Value;

/// Maximum allowed key length in bytes.
pub const MAX_KEY_LENGTH: usize = 256;

fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} characters",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for the SET operation.
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store (any JSON-serializable data)
/// - `expire`: Optional TTL in seconds (falls back to the configured
///   auto-expire when absent or zero)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub expire: Option<u64>,
}

impl SetRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body for the GET operation.
#[derive(Debug, Clone, Deserialize)]
pub struct GetRequest {
    /// The cache key to look up
    pub key: String,
}

impl GetRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body for the ADD operation.
///
/// Same shape as [`SetRequest`], but the write only succeeds when the key
/// is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct AddRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub expire: Option<u64>,
}

impl AddRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body for the DELETE operation.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRequest {
    /// The cache key to remove
    pub key: String,
}

impl DeleteRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

fn default_amount() -> i64 {
    1
}

/// Request body for the INCR and DECR operations.
///
/// # Fields
/// - `key`: The counter key
/// - `amount`: Step size, defaults to 1 when omitted
#[derive(Debug, Clone, Deserialize)]
pub struct IncrRequest {
    /// The counter key
    pub key: String,
    /// Step size (default 1)
    #[serde(default = "default_amount")]
    pub amount: i64,
}

impl IncrRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

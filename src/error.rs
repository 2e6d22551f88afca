//! Error types for the cache plugin
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
///
/// Every failure is returned to the immediate caller; the adapter performs
/// no local retry. Reconnect policy lives in the store client configuration.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Transport, connection or command failure from the external store
    #[error("store error: {0}")]
    Store(#[from] redis::RedisError),

    /// Stored value is not valid JSON on read
    #[error("could not decode JSON data at key '{key}'")]
    Decode {
        /// The key whose stored value failed to decode
        key: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// `add` attempted on a key that already exists
    #[error("add failed - key '{0}' already exists")]
    KeyExists(String),

    /// `incr`/`decr` attempted on a value that is not a base-10 integer
    #[error("{op} failed - value for key '{key}' is not a number")]
    NotANumber {
        /// Operation kind, `"incr"` or `"decr"`
        op: &'static str,
        /// The offending key
        key: String,
    },

    /// Invalid request data rejected at the action boundary
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Stable machine-readable code for each variant.
    ///
    /// Lets callers distinguish corruption (`decode`) from transport
    /// failure (`store`) without parsing messages.
    pub fn code(&self) -> &'static str {
        match self {
            CacheError::Store(_) => "store",
            CacheError::Decode { .. } => "decode",
            CacheError::KeyExists(_) => "key-exists",
            CacheError::NotANumber { .. } => "not-a-number",
            CacheError::InvalidRequest(_) => "invalid-request",
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache plugin.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_exists_message_names_key() {
        let err = CacheError::KeyExists("session:42".to_string());
        assert!(err.to_string().contains("session:42"));
        assert_eq!(err.code(), "key-exists");
    }

    #[test]
    fn test_not_a_number_message_names_op_and_key() {
        let err = CacheError::NotANumber {
            op: "decr",
            key: "counter".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("decr"));
        assert!(msg.contains("counter"));
        assert_eq!(err.code(), "not-a-number");
    }

    #[test]
    fn test_decode_error_carries_source() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = CacheError::Decode {
            key: "k".to_string(),
            source,
        };
        assert_eq!(err.code(), "decode");
        assert!(std::error::Error::source(&err).is_some());
    }
}

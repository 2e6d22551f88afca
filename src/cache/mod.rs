//! Cache Module
//!
//! The adapter translating logical cache operations into store primitives,
//! with JSON value coding and the auto-expiry policy.

mod adapter;


// Re-export public types
pub use adapter::CacheAdapter;

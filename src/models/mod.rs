//! Request and Response models for the cache action surface
//!
//! This module defines the DTOs used for deserializing incoming action
//! messages and serializing replies, one request/response pair per operation.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{AddRequest, DeleteRequest, GetRequest, IncrRequest, SetRequest};
pub use responses::{
    AddResponse, CounterResponse, DeleteResponse, ErrorResponse, GetResponse, SetResponse,
};

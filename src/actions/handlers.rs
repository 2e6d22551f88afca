//! Action Handlers
//!
//! One handler per cache action. Each handler validates its request,
//! delegates to the adapter, and shapes the reply.

use tracing::warn;

use crate::actions::PluginState;
use crate::error::{CacheError, Result};
use crate::models::requests::{AddRequest, DeleteRequest, GetRequest, IncrRequest, SetRequest};
use crate::models::responses::{
    AddResponse, CounterResponse, DeleteResponse, GetResponse, SetResponse,
};
use crate::store::StoreBackend;

/// Handler for `cache:set`
///
/// Writes the value unconditionally and echoes the key.
pub async fn set_handler<S: StoreBackend>(
    state: &PluginState<S>,
    req: SetRequest,
) -> Result<SetResponse> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.adapter.set(&req.key, &req.value, req.expire).await?;
    Ok(SetResponse::new(req.key))
}

/// Handler for `cache:get`
///
/// Absent keys reply with a null value, not an error.
pub async fn get_handler<S: StoreBackend>(
    state: &PluginState<S>,
    req: GetRequest,
) -> Result<GetResponse> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let value = state.adapter.get(&req.key).await?;
    Ok(GetResponse::new(value))
}

/// Handler for `cache:add`
///
/// Writes only if the key is absent; fails with a key-exists error
/// otherwise.
pub async fn add_handler<S: StoreBackend>(
    state: &PluginState<S>,
    req: AddRequest,
) -> Result<AddResponse> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.adapter.add(&req.key, &req.value, req.expire).await?;
    Ok(AddResponse::new(req.key))
}

/// Handler for `cache:delete`
///
/// Replies with the key whether or not it existed.
pub async fn delete_handler<S: StoreBackend>(
    state: &PluginState<S>,
    req: DeleteRequest,
) -> Result<DeleteResponse> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.adapter.delete(&req.key).await?;
    Ok(DeleteResponse::new(req.key))
}

/// Handler for `cache:incr`
pub async fn incr_handler<S: StoreBackend>(
    state: &PluginState<S>,
    req: IncrRequest,
) -> Result<CounterResponse> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let value = state.adapter.incr(&req.key, req.amount).await?;
    Ok(CounterResponse::new(value))
}

/// Handler for `cache:decr`
pub async fn decr_handler<S: StoreBackend>(
    state: &PluginState<S>,
    req: IncrRequest,
) -> Result<CounterResponse> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let value = state.adapter.decr(&req.key, req.amount).await?;
    Ok(CounterResponse::new(value))
}

/// Handler for `cache:clear`
///
/// Flushes the store's entire active logical database. Every key in the
/// target database is wiped, not just keys this plugin wrote.
pub async fn clear_handler<S: StoreBackend>(state: &PluginState<S>) -> Result<()> {
    state.adapter.clear().await
}

/// Handler for `cache:close`
///
/// Best effort: a store quit failure is logged, never fatal, so host
/// teardown can continue.
pub async fn close_handler<S: StoreBackend>(state: &PluginState<S>) -> Result<()> {
    if let Err(err) = state.adapter.close().await {
        warn!(error = %err, "store quit failed");
    }
    Ok(())
}

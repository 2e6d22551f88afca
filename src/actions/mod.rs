//! Action Surface Module
//!
//! Routes incoming cache action messages to their handlers and owns plugin
//! lifecycle plumbing. This is the typed replacement for duck-typed
//! `{role, cmd, ...}` dispatch: one closed enum of actions, one
//! request/response pair per operation, validated at the boundary.

pub mod handlers;

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::CacheAdapter;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::models::requests::{AddRequest, DeleteRequest, GetRequest, IncrRequest, SetRequest};
use crate::models::responses::{
    AddResponse, CounterResponse, DeleteResponse, ErrorResponse, GetResponse, SetResponse,
};
use crate::store::{RedisStore, StoreBackend};

// == Plugin Identity ==
/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "redis-cache";

/// Role prefix for action patterns.
pub const ROLE: &str = "cache";

const COMMANDS: [&str; 8] = [
    "set", "get", "add", "delete", "incr", "decr", "clear", "close",
];

/// Action patterns this plugin answers, for host registration
/// (`cache:set` through `cache:close`).
pub fn patterns() -> Vec<String> {
    COMMANDS.iter().map(|cmd| format!("{ROLE}:{cmd}")).collect()
}

// == Cache Action ==
/// The closed set of actions this plugin handles, tagged by `cmd`.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum CacheAction {
    Set(SetRequest),
    Get(GetRequest),
    Add(AddRequest),
    Delete(DeleteRequest),
    Incr(IncrRequest),
    Decr(IncrRequest),
    Clear,
    Close,
}

// == Cache Reply ==
/// Success reply bodies, one per action shape.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CacheReply {
    Set(SetResponse),
    Get(GetResponse),
    Add(AddResponse),
    Delete(DeleteResponse),
    Counter(CounterResponse),
    Empty {},
}

// == Plugin State ==
/// Shared plugin state handed to every handler.
///
/// Holds the adapter behind an `Arc`; cloning the state shares the same
/// store connection.
pub struct PluginState<S: StoreBackend> {
    /// The cache adapter over the external store
    pub adapter: Arc<CacheAdapter<S>>,
}

impl<S: StoreBackend> Clone for PluginState<S> {
    fn clone(&self) -> Self {
        Self {
            adapter: Arc::clone(&self.adapter),
        }
    }
}

impl PluginState<RedisStore> {
    /// Connects to the external store and builds the plugin state.
    pub async fn connect(config: CacheConfig) -> Result<Self> {
        Ok(Self::new(CacheAdapter::connect(config).await?))
    }
}

impl<S: StoreBackend> PluginState<S> {
    /// Wraps an already-constructed adapter.
    pub fn new(adapter: CacheAdapter<S>) -> Self {
        Self {
            adapter: Arc::new(adapter),
        }
    }

    /// Borrow of the underlying store backend, the native-handle accessor.
    pub fn native(&self) -> &S {
        self.adapter.store()
    }

    /// Routes a typed action to its handler.
    pub async fn dispatch(&self, action: CacheAction) -> Result<CacheReply> {
        match action {
            CacheAction::Set(req) => handlers::set_handler(self, req).await.map(CacheReply::Set),
            CacheAction::Get(req) => handlers::get_handler(self, req).await.map(CacheReply::Get),
            CacheAction::Add(req) => handlers::add_handler(self, req).await.map(CacheReply::Add),
            CacheAction::Delete(req) => handlers::delete_handler(self, req)
                .await
                .map(CacheReply::Delete),
            CacheAction::Incr(req) => handlers::incr_handler(self, req)
                .await
                .map(CacheReply::Counter),
            CacheAction::Decr(req) => handlers::decr_handler(self, req)
                .await
                .map(CacheReply::Counter),
            CacheAction::Clear => handlers::clear_handler(self)
                .await
                .map(|_| CacheReply::Empty {}),
            CacheAction::Close => handlers::close_handler(self)
                .await
                .map(|_| CacheReply::Empty {}),
        }
    }

    /// Message-in, message-out surface: parses the action from a JSON
    /// message, dispatches it, and maps failures to an [`ErrorResponse`]
    /// body. Exactly one reply per message.
    pub async fn handle(&self, message: Value) -> Value {
        let action: CacheAction = match serde_json::from_value(message) {
            Ok(action) => action,
            Err(err) => {
                let err = CacheError::InvalidRequest(err.to_string());
                return error_body(&err);
            }
        };

        match self.dispatch(action).await {
            Ok(reply) => serde_json::to_value(&reply).unwrap_or(Value::Null),
            Err(err) => {
                debug!(code = err.code(), error = %err, "action failed");
                error_body(&err)
            }
        }
    }
}

impl<S: StoreBackend + 'static> PluginState<S> {
    /// Registers this plugin's teardown on the stack.
    ///
    /// The close hook logs a store quit failure and lets teardown proceed;
    /// hooks the host pushes afterwards still run.
    pub fn register_teardown(&self, stack: &mut TeardownStack) {
        let adapter = Arc::clone(&self.adapter);
        stack.push(move || async move {
            if let Err(err) = adapter.close().await {
                warn!(error = %err, "store quit failed during teardown");
            }
        });
    }
}

fn error_body(err: &CacheError) -> Value {
    serde_json::to_value(ErrorResponse::from(err)).unwrap_or(Value::Null)
}

// == Teardown Stack ==
/// Ordered list of async teardown callbacks.
///
/// Hooks run in push order when the host shuts down: this plugin's own
/// close logic first, then whatever the host registered after it. Explicit
/// ordering instead of handler-chain delegation.
#[derive(Default)]
pub struct TeardownStack {
    hooks: Vec<Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>>,
}

impl TeardownStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a teardown hook.
    pub fn push<F, Fut>(&mut self, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.hooks
            .push(Box::new(move || Box::pin(hook()) as BoxFuture<'static, ()>));
    }

    /// Runs every hook, in push order. Consumes the stack; each hook runs
    /// exactly once.
    pub async fn run(mut self) {
        for hook in self.hooks.drain(..) {
            hook().await;
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_cover_every_command() {
        let patterns = patterns();
        assert_eq!(patterns.len(), 8);
        assert!(patterns.contains(&"cache:set".to_string()));
        assert!(patterns.contains(&"cache:close".to_string()));
        assert!(patterns.iter().all(|p| p.starts_with("cache:")));
    }

    #[test]
    fn test_action_deserialize_tagged_by_cmd() {
        let action: CacheAction =
            serde_json::from_value(serde_json::json!({"cmd": "set", "key": "k", "value": 1}))
                .unwrap();
        assert!(matches!(action, CacheAction::Set(_)));

        let action: CacheAction =
            serde_json::from_value(serde_json::json!({"cmd": "clear"})).unwrap();
        assert!(matches!(action, CacheAction::Clear));
    }

    #[test]
    fn test_action_unknown_cmd_is_rejected() {
        let result: std::result::Result<CacheAction, _> =
            serde_json::from_value(serde_json::json!({"cmd": "evict", "key": "k"}));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_teardown_runs_in_push_order() {
        use std::sync::Mutex;

        let order = Arc::new(Mutex::new(Vec::new()));
        let mut stack = TeardownStack::new();

        for label in ["plugin", "host-a", "host-b"] {
            let order = Arc::clone(&order);
            stack.push(move || async move {
                order.lock().unwrap().push(label);
            });
        }

        assert_eq!(stack.len(), 3);
        stack.run().await;
        assert_eq!(*order.lock().unwrap(), vec!["plugin", "host-a", "host-b"]);
    }
}

//! The outbound capability handed to handlers.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::client::types::ApiResult;

/// Follow-up calls a handler may issue against the platform.
///
/// Handlers receive this as `Arc<dyn PlatformApi>`, so tests can hand in a
/// recording fake instead of a live client.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Open a new view. Returns the created view object.
    async fn views_open(&self, interactivity_pointer: &str, view: Value) -> ApiResult<Value>;

    /// Push a view onto the current stack.
    async fn views_push(&self, interactivity_pointer: &str, view: Value) -> ApiResult<Value>;

    /// Replace an existing view. `hash` guards against racing updates.
    async fn views_update(&self, view_id: &str, hash: Option<&str>, view: Value)
        -> ApiResult<Value>;

    /// Mark a function execution complete with its outputs.
    async fn complete_success(&self, execution_id: &str, outputs: Map<String, Value>)
        -> ApiResult<()>;

    /// Mark a function execution failed.
    async fn complete_error(&self, execution_id: &str, error: &str) -> ApiResult<()>;
}

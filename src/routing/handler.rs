//! Handler trait and the context passed to handlers.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::actions::ResponseAction;
use crate::client::{ApiError, PlatformApi};
use crate::events::{EventCategory, ViewEvent};

/// Errors a handler may fail with. Returned to the dispatch caller as-is.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A follow-up platform call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The payload did not carry what the handler needs.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Any other handler failure.
    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// What a handler produces: an optional response action.
pub type HandlerResult = Result<Option<ResponseAction>, HandlerError>;

/// Everything a handler gets for one interaction.
#[derive(Clone)]
pub struct ViewContext {
    /// Callback ID of the function that owns the router.
    pub function_id: Arc<str>,
    pub category: EventCategory,
    pub event: ViewEvent,
    /// Short-lived pointer for `views.open` / `views.push`, if delivered.
    pub interactivity_pointer: Option<String>,
    pub client: Arc<dyn PlatformApi>,
}

impl ViewContext {
    pub fn new(
        function_id: impl Into<Arc<str>>,
        category: EventCategory,
        event: ViewEvent,
        client: Arc<dyn PlatformApi>,
    ) -> Self {
        let interactivity_pointer = event.interactivity_pointer().map(str::to_string);
        Self {
            function_id: function_id.into(),
            category,
            event,
            interactivity_pointer,
            client,
        }
    }

    pub fn callback_id(&self) -> &str {
        self.event.callback_id()
    }

    /// The interactivity pointer, or an error naming the missing field.
    pub fn require_pointer(&self) -> Result<&str, HandlerError> {
        self.interactivity_pointer
            .as_deref()
            .ok_or_else(|| HandlerError::InvalidPayload("missing interactivity_pointer".into()))
    }
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext")
            .field("function_id", &self.function_id)
            .field("category", &self.category)
            .field("callback_id", &self.callback_id())
            .field("interactivity_pointer", &self.interactivity_pointer)
            .finish_non_exhaustive()
    }
}

/// A unit of behavior bound to one or more registrations.
///
/// Implemented for any `Fn(ViewContext) -> impl Future<Output = HandlerResult>`,
/// so async closures register directly.
#[async_trait]
pub trait ViewHandler: Send + Sync {
    async fn handle(&self, ctx: ViewContext) -> HandlerResult;
}

/// Pins a closure to the handler signature so `?` and `Ok(None)` infer
/// without annotations.
pub fn handler_fn<F, Fut>(f: F) -> F
where
    F: Fn(ViewContext) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    f
}

#[async_trait]
impl<F, Fut> ViewHandler for F
where
    F: Fn(ViewContext) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: ViewContext) -> HandlerResult {
        (self)(ctx).await
    }
}

//! Callback ID lookup and dispatch.
//!
//! # Responsibilities
//! - Store registrations per event category, in registration order
//! - Find the first registration whose constraint matches a callback ID
//! - Invoke exactly that handler and hand its result back untouched
//!
//! # Design Decisions
//! - Builder by value during setup, immutable afterwards (share via Arc)
//! - O(n) scan per dispatch; registration order is the only priority
//! - Explicit NoMatch rather than an error or a silent default
//! - Handler errors are returned as-is: no logging, retry, or wrapping here

use std::sync::Arc;

use crate::actions::ResponseAction;
use crate::client::PlatformApi;
use crate::events::{EventCategory, ViewEvent};
use crate::functions::FunctionDefinition;
use crate::routing::handler::{HandlerError, ViewContext, ViewHandler};
use crate::routing::matcher::Constraint;

/// A constraint paired with the handler it selects.
#[derive(Clone)]
pub struct Registration {
    constraint: Constraint,
    handler: Arc<dyn ViewHandler>,
}

impl Registration {
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn handler(&self) -> &Arc<dyn ViewHandler> {
        &self.handler
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("constraint", &self.constraint)
            .finish_non_exhaustive()
    }
}

/// Result of a dispatch that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A handler ran; carries its response action, if any.
    Handled(Option<ResponseAction>),
    /// No registration matched. Nothing was invoked.
    NoMatch,
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchOutcome::Handled(_))
    }

    /// The response action, if a handler ran and returned one.
    pub fn into_action(self) -> Option<ResponseAction> {
        match self {
            DispatchOutcome::Handled(action) => action,
            DispatchOutcome::NoMatch => None,
        }
    }
}

/// Ordered dispatch table for the view events of one function.
#[derive(Clone)]
pub struct ViewRouter {
    function_id: Arc<str>,
    submissions: Vec<Registration>,
    closed: Vec<Registration>,
}

impl ViewRouter {
    /// Create an empty router owned by the function `function_id`.
    pub fn new(function_id: impl Into<Arc<str>>) -> Self {
        Self {
            function_id: function_id.into(),
            submissions: Vec::new(),
            closed: Vec::new(),
        }
    }

    /// Create an empty router owned by `definition`.
    pub fn for_function(definition: &FunctionDefinition) -> Self {
        Self::new(definition.callback_id.as_str())
    }

    /// Append a registration to `category`.
    pub fn register<H>(self, category: EventCategory, constraint: impl Into<Constraint>, handler: H) -> Self
    where
        H: ViewHandler + 'static,
    {
        self.register_shared(category, constraint, Arc::new(handler))
    }

    /// Append a registration whose handler is shared with other registrations.
    pub fn register_shared(
        mut self,
        category: EventCategory,
        constraint: impl Into<Constraint>,
        handler: Arc<dyn ViewHandler>,
    ) -> Self {
        let registration = Registration {
            constraint: constraint.into(),
            handler,
        };
        tracing::trace!(
            function_id = %self.function_id,
            category = %category,
            constraint = ?registration.constraint,
            "Registered view handler"
        );
        self.list_mut(category).push(registration);
        self
    }

    /// Register a `view_submission` handler.
    pub fn view_submission<H>(self, constraint: impl Into<Constraint>, handler: H) -> Self
    where
        H: ViewHandler + 'static,
    {
        self.register(EventCategory::ViewSubmission, constraint, handler)
    }

    /// Register a `view_closed` handler.
    pub fn view_closed<H>(self, constraint: impl Into<Constraint>, handler: H) -> Self
    where
        H: ViewHandler + 'static,
    {
        self.register(EventCategory::ViewClosed, constraint, handler)
    }

    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    /// Registrations of `category`, in match priority order.
    pub fn registrations(&self, category: EventCategory) -> &[Registration] {
        match category {
            EventCategory::ViewSubmission => &self.submissions,
            EventCategory::ViewClosed => &self.closed,
        }
    }

    fn list_mut(&mut self, category: EventCategory) -> &mut Vec<Registration> {
        match category {
            EventCategory::ViewSubmission => &mut self.submissions,
            EventCategory::ViewClosed => &mut self.closed,
        }
    }

    /// First registration of `category` matching `callback_id`, with its index.
    pub fn find(&self, category: EventCategory, callback_id: &str) -> Option<(usize, &Registration)> {
        self.registrations(category)
            .iter()
            .enumerate()
            .find(|(_, r)| r.constraint.matches(callback_id))
    }

    /// Route `event` to the first matching handler of `category`.
    ///
    /// Returns `NoMatch` without invoking anything when no constraint matches.
    /// A handler error is returned unchanged.
    pub async fn dispatch(
        &self,
        category: EventCategory,
        event: ViewEvent,
        client: Arc<dyn PlatformApi>,
    ) -> Result<DispatchOutcome, HandlerError> {
        let Some((index, registration)) = self.find(category, event.callback_id()) else {
            tracing::debug!(
                function_id = %self.function_id,
                category = %category,
                callback_id = %event.callback_id(),
                "No view handler matched"
            );
            return Ok(DispatchOutcome::NoMatch);
        };

        tracing::debug!(
            function_id = %self.function_id,
            category = %category,
            callback_id = %event.callback_id(),
            registration = index,
            "Dispatching to view handler"
        );

        let handler = Arc::clone(&registration.handler);
        let ctx = ViewContext::new(Arc::clone(&self.function_id), category, event, client);
        let action = handler.handle(ctx).await?;
        Ok(DispatchOutcome::Handled(action))
    }
}

impl std::fmt::Debug for ViewRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRouter")
            .field("function_id", &self.function_id)
            .field("submissions", &self.submissions)
            .field("closed", &self.closed)
            .finish()
    }
}

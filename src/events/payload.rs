//! View interaction payload definitions.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading an inbound payload.
#[derive(Debug, Error)]
pub enum EventError {
    /// The payload has no `view.callback_id` string.
    #[error("payload is missing view.callback_id")]
    MissingCallbackId,

    /// The payload is not a JSON object with a `view` object.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The category tag is neither view_submission nor view_closed.
    #[error("unknown event category `{0}`")]
    UnknownCategory(String),
}

/// Result type for payload parsing.
pub type EventResult<T> = Result<T, EventError>;

/// The two interaction categories a router dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// The user pressed the submit button of a view.
    ViewSubmission,
    /// The user dismissed a view (only delivered when `notify_on_close` is set).
    ViewClosed,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::ViewSubmission => "view_submission",
            EventCategory::ViewClosed => "view_closed",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view_submission" | "submission" => Ok(EventCategory::ViewSubmission),
            "view_closed" | "closed" => Ok(EventCategory::ViewClosed),
            other => Err(EventError::UnknownCategory(other.to_string())),
        }
    }
}

/// Read an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// The view a payload refers to.
///
/// Only `callback_id` is required. Other typed fields fall back to `None`
/// when they carry an unexpected shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct View {
    /// Identifier assigned when the view was opened; the routing key.
    pub callback_id: String,

    /// Platform view ID, used for `views.update`.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Hash guarding against stale updates.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Submitted form state (`{"values": {block_id: {action_id: ...}}}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Execution data of the function that opened the view.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FunctionData {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionRef>,

    #[serde(default, deserialize_with = "lenient_or_default")]
    pub inputs: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to the owning function declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FunctionRef {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Interactivity context of the user action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Interactivity {
    /// Short-lived token required for `views.open` / `views.push`.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub interactivity_pointer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactor: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A `view_submission` or `view_closed` payload.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewEvent {
    #[serde(rename = "type", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub view: View,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub function_data: Option<FunctionData>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub interactivity: Option<Interactivity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,

    /// Set on `view_closed` when the whole view stack was dismissed.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub is_cleared: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewEvent {
    /// Read a payload, requiring only `view.callback_id`.
    ///
    /// Optional fields of an unexpected shape are read as absent rather than
    /// rejecting the event.
    pub fn from_value(value: Value) -> EventResult<Self> {
        if value.pointer("/view/callback_id").and_then(Value::as_str).is_none() {
            return Err(EventError::MissingCallbackId);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Minimal payload carrying only a callback ID.
    pub fn with_callback_id(callback_id: impl Into<String>) -> Self {
        Self {
            kind: None,
            view: View {
                callback_id: callback_id.into(),
                id: None,
                hash: None,
                state: None,
                private_metadata: None,
                extra: Map::new(),
            },
            function_data: None,
            interactivity: None,
            team: None,
            user: None,
            is_cleared: None,
            extra: Map::new(),
        }
    }

    pub fn callback_id(&self) -> &str {
        &self.view.callback_id
    }

    pub fn interactivity_pointer(&self) -> Option<&str> {
        self.interactivity
            .as_ref()
            .and_then(|i| i.interactivity_pointer.as_deref())
    }

    pub fn execution_id(&self) -> Option<&str> {
        self.function_data
            .as_ref()
            .and_then(|f| f.execution_id.as_deref())
    }

    /// Inputs the owning function was invoked with (empty if absent).
    pub fn inputs(&self) -> Map<String, Value> {
        self.function_data
            .as_ref()
            .map(|f| f.inputs.clone())
            .unwrap_or_default()
    }

    /// `view.state.values`, if the view carried form state.
    pub fn state_values(&self) -> Option<&Map<String, Value>> {
        self.view
            .state
            .as_ref()
            .and_then(|s| s.get("values"))
            .and_then(Value::as_object)
    }
}

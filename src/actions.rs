//! Response actions a view submission handler can return.
//!
//! The router passes these through untouched; the delivery boundary
//! serializes them into the acknowledgement body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Follow-up UI effect reported back to the platform.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "response_action", rename_all = "snake_case")]
pub enum ResponseAction {
    /// Replace the current view.
    Update { view: Value },
    /// Push a new view onto the stack.
    Push { view: Value },
    /// Keep the view open and show errors keyed by block ID.
    Errors { errors: BTreeMap<String, String> },
    /// Close every view in the stack.
    Clear,
}

impl ResponseAction {
    pub fn update(view: Value) -> Self {
        Self::Update { view }
    }

    pub fn push(view: Value) -> Self {
        Self::Push { view }
    }

    pub fn clear() -> Self {
        Self::Clear
    }

    /// Validation errors, one message per block ID.
    pub fn errors<I, K, V>(errors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Errors {
            errors: errors
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

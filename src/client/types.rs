//! Platform API types and error definitions.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur during platform API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout, or body decoding failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered with a non-success HTTP status.
    #[error("{method} returned HTTP {status}: {body}")]
    Status {
        method: String,
        status: u16,
        body: String,
    },

    /// The platform answered `ok: false`.
    #[error("{method} failed: {code}")]
    Platform { method: String, code: String },

    /// The base URL and method name do not form a URL.
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    /// No bot token in config or environment.
    #[error("no bot token configured")]
    MissingToken,
}

/// Result type for platform API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Every Web API response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub ok: bool,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Envelope {
    pub(crate) fn into_result(self, method: &str) -> ApiResult<Map<String, Value>> {
        if self.ok {
            Ok(self.data)
        } else {
            Err(ApiError::Platform {
                method: method.to_string(),
                code: self.error.unwrap_or_else(|| "unknown_error".to_string()),
            })
        }
    }
}

//! Web API client with timeout and error handling.
//!
//! # Responsibilities
//! - POST JSON to `{base_url}/{method}` with a bearer token
//! - Unwrap the `{ok, error, ...}` envelope into `ApiResult`
//! - Surface HTTP and platform failures as distinct errors
//!
//! # Design Decisions
//! - One attempt per call, no retries (callers own retry policy)
//! - Timeout is enforced by the reqwest client, not by handlers

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use url::Url;

use crate::client::api::PlatformApi;
use crate::client::types::{ApiError, ApiResult, Envelope};
use crate::config::ApiConfig;

/// `PlatformApi` backed by the platform's HTTP Web API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `config` - API configuration; the token may come from the environment
    ///
    /// # Returns
    /// A new client, or an error if the URL is invalid or no token is available
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let token = config.resolved_token().ok_or(ApiError::MissingToken)?;
        Self::with_token(config, token)
    }

    /// Create a client with an explicit token.
    pub fn with_token(config: &ApiConfig, token: impl Into<String>) -> ApiResult<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        // Url::join drops the last path segment unless it ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        tracing::info!(base_url = %base_url, "Platform API client initialized");

        Ok(Self {
            http,
            base_url,
            token: token.into(),
        })
    }

    /// Call a Web API method and return the envelope payload.
    pub async fn call(&self, method: &str, body: Value) -> ApiResult<Map<String, Value>> {
        let url = self.base_url.join(method)?;
        tracing::debug!(method = %method, "Calling platform API");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(method = %method, status = status.as_u16(), "Platform API returned error status");
            return Err(ApiError::Status {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope = response.json().await?;
        envelope.into_result(method).inspect_err(|e| {
            tracing::warn!(method = %method, error = %e, "Platform API call failed");
        })
    }

    async fn call_for_view(&self, method: &str, body: Value) -> ApiResult<Value> {
        let mut data = self.call(method, body).await?;
        Ok(data.remove("view").unwrap_or(Value::Null))
    }
}

#[async_trait]
impl PlatformApi for ApiClient {
    async fn views_open(&self, interactivity_pointer: &str, view: Value) -> ApiResult<Value> {
        self.call_for_view(
            "views.open",
            json!({ "interactivity_pointer": interactivity_pointer, "view": view }),
        )
        .await
    }

    async fn views_push(&self, interactivity_pointer: &str, view: Value) -> ApiResult<Value> {
        self.call_for_view(
            "views.push",
            json!({ "interactivity_pointer": interactivity_pointer, "view": view }),
        )
        .await
    }

    async fn views_update(
        &self,
        view_id: &str,
        hash: Option<&str>,
        view: Value,
    ) -> ApiResult<Value> {
        let mut body = json!({ "view_id": view_id, "view": view });
        if let Some(hash) = hash {
            body["hash"] = Value::String(hash.to_string());
        }
        self.call_for_view("views.update", body).await
    }

    async fn complete_success(
        &self,
        execution_id: &str,
        outputs: Map<String, Value>,
    ) -> ApiResult<()> {
        self.call(
            "functions.completeSuccess",
            json!({ "function_execution_id": execution_id, "outputs": outputs }),
        )
        .await?;
        Ok(())
    }

    async fn complete_error(&self, execution_id: &str, error: &str) -> ApiResult<()> {
        self.call(
            "functions.completeError",
            json!({ "function_execution_id": execution_id, "error": error }),
        )
        .await?;
        Ok(())
    }
}

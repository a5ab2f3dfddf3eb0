//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde_json::{json, Map, Value};
use surface_router::client::{ApiError, ApiResult, PlatformApi};
use surface_router::routing::{HandlerResult, ViewContext, ViewHandler};
use surface_router::ResponseAction;
use tokio::net::TcpListener;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub target: String,
    pub body: Value,
}

/// In-memory `PlatformApi` that records every call.
#[derive(Default)]
pub struct MockPlatform {
    pub calls: Mutex<Vec<Call>>,
    /// When set, every call fails with this platform error code.
    pub fail_with: Option<&'static str>,
}

impl MockPlatform {
    pub fn failing(code: &'static str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(code),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, target: &str, body: Value) -> ApiResult<()> {
        self.calls.lock().unwrap().push(Call {
            method,
            target: target.to_string(),
            body,
        });
        match self.fail_with {
            Some(code) => Err(ApiError::Platform {
                method: method.to_string(),
                code: code.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlatformApi for MockPlatform {
    async fn views_open(&self, pointer: &str, view: Value) -> ApiResult<Value> {
        self.record("views.open", pointer, view.clone())?;
        Ok(view)
    }

    async fn views_push(&self, pointer: &str, view: Value) -> ApiResult<Value> {
        self.record("views.push", pointer, view.clone())?;
        Ok(view)
    }

    async fn views_update(&self, view_id: &str, _hash: Option<&str>, view: Value) -> ApiResult<Value> {
        self.record("views.update", view_id, view.clone())?;
        Ok(view)
    }

    async fn complete_success(&self, execution_id: &str, outputs: Map<String, Value>) -> ApiResult<()> {
        self.record("functions.completeSuccess", execution_id, Value::Object(outputs))
    }

    async fn complete_error(&self, execution_id: &str, error: &str) -> ApiResult<()> {
        self.record("functions.completeError", execution_id, json!(error))
    }
}

/// Handler that records its label and answers with an `update` naming it.
pub struct Labelled {
    pub label: &'static str,
    pub seen: Arc<Mutex<Vec<&'static str>>>,
}

impl Labelled {
    pub fn new(label: &'static str, seen: &Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self {
            label,
            seen: Arc::clone(seen),
        }
    }
}

#[async_trait]
impl ViewHandler for Labelled {
    async fn handle(&self, _ctx: ViewContext) -> HandlerResult {
        self.seen.lock().unwrap().push(self.label);
        Ok(Some(ResponseAction::update(json!({ "handled_by": self.label }))))
    }
}

/// A recorded request to the mock Web API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockApiState {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    respond: Arc<dyn Fn(&str) -> (u16, Value) + Send + Sync>,
}

/// Start a mock Web API on an ephemeral port.
///
/// `respond` maps a method name to the status and JSON body to return.
pub async fn start_mock_api<F>(respond: F) -> (SocketAddr, Arc<Mutex<Vec<ApiRequest>>>)
where
    F: Fn(&str) -> (u16, Value) + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockApiState {
        requests: Arc::clone(&requests),
        respond: Arc::new(respond),
    };

    let app = Router::new()
        .route("/api/{method}", post(mock_method))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, requests)
}

async fn mock_method(
    State(state): State<MockApiState>,
    axum::extract::Path(method): axum::extract::Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (axum::http::StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(ApiRequest {
        method: method.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    let (status, body) = (state.respond)(&method);
    (
        axum::http::StatusCode::from_u16(status).unwrap(),
        Json(body),
    )
}

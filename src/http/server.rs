//! HTTP delivery endpoint.
//!
//! # Responsibilities
//! - Create the Axum router with the delivery handlers
//! - Wire up middleware (tracing, body limit)
//! - Look up the function's ViewRouter and dispatch the payload
//! - Turn the dispatch outcome into the acknowledgement response

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::client::PlatformApi;
use crate::config::ServerConfig;
use crate::events::{EventCategory, ViewEvent};
use crate::routing::{DispatchOutcome, ViewRouter};

/// Response header carrying the delivery ID.
pub const X_DELIVERY_ID: &str = "x-delivery-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routers: Arc<HashMap<String, Arc<ViewRouter>>>,
    pub client: Arc<dyn PlatformApi>,
}

/// HTTP server receiving view events from the hosting runtime.
pub struct DeliveryServer {
    router: Router,
    config: ServerConfig,
}

impl DeliveryServer {
    /// Create a server dispatching to `routers`, keyed by their function ID.
    ///
    /// A later router for the same function replaces an earlier one.
    pub fn new<I>(config: ServerConfig, client: Arc<dyn PlatformApi>, routers: I) -> Self
    where
        I: IntoIterator<Item = ViewRouter>,
    {
        let routers: HashMap<_, _> = routers
            .into_iter()
            .map(|r| (r.function_id().to_string(), Arc::new(r)))
            .collect();

        tracing::info!(functions = routers.len(), "Delivery routes compiled");

        let state = AppState {
            routers: Arc::new(routers),
            client,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The `Json` extractor carries its own 2 MiB default, so both limits
    /// are set from `max_body_bytes`.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/functions/{function_id}/{category}", post(delivery_handler))
            .route("/health", get(|| async { "ok" }))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.max_body_bytes))
            .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// The Axum router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run until `shutdown` resolves.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Delivery server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Delivery server stopped");
        Ok(())
    }
}

/// Dispatch one delivered view event.
async fn delivery_handler(
    State(state): State<AppState>,
    Path((function_id, category)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Response {
    let delivery_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "delivery",
        delivery_id = %delivery_id,
        function_id = %function_id,
        category = %category
    );

    let mut response = deliver(state, &function_id, &category, payload)
        .instrument(span)
        .await;

    if let Ok(value) = HeaderValue::from_str(&delivery_id.to_string()) {
        response.headers_mut().insert(X_DELIVERY_ID, value);
    }
    response
}

async fn deliver(state: AppState, function_id: &str, category: &str, payload: Value) -> Response {
    let category: EventCategory = match category.parse() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "Unknown event category");
            return (StatusCode::NOT_FOUND, e.to_string()).into_response();
        }
    };

    let Some(router) = state.routers.get(function_id).cloned() else {
        tracing::warn!("No router registered for function");
        return (StatusCode::NOT_FOUND, "Unknown function").into_response();
    };

    let event = match ViewEvent::from_value(payload) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected payload");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match router.dispatch(category, event, state.client.clone()).await {
        Ok(DispatchOutcome::Handled(Some(action))) => (StatusCode::OK, Json(action)).into_response(),
        Ok(DispatchOutcome::Handled(None)) | Ok(DispatchOutcome::NoMatch) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "View handler failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Handler failed").into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

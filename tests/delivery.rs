//! Delivery endpoint tests, driven in-process through the Axum router.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use surface_router::config::ServerConfig;
use surface_router::http::X_DELIVERY_ID;
use surface_router::routing::{handler_fn, HandlerError, ViewContext};
use surface_router::{DeliveryServer, ViewRouter};
use tower::ServiceExt;

mod common;
use common::{Labelled, MockPlatform};

fn server(seen: &Arc<Mutex<Vec<&'static str>>>) -> DeliveryServer {
    server_with(ServerConfig::default(), seen)
}

fn server_with(config: ServerConfig, seen: &Arc<Mutex<Vec<&'static str>>>) -> DeliveryServer {
    let router = ViewRouter::new("open_form")
        .view_submission("form", Labelled::new("submitted", seen))
        .view_closed("form", handler_fn(|_ctx: ViewContext| async move { Ok(None) }))
        .view_submission(
            "broken",
            handler_fn(|_ctx: ViewContext| async move { Err(HandlerError::failed("boom")) }),
        );
    DeliveryServer::new(config, Arc::new(MockPlatform::default()), [router])
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Option<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    }
}

#[tokio::test]
async fn test_submission_returns_response_action() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = server(&seen).router();

    let response = app
        .oneshot(post(
            "/functions/open_form/view_submission",
            json!({ "type": "view_submission", "view": { "callback_id": "form" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(X_DELIVERY_ID));
    assert_eq!(
        body_json(response).await,
        Some(json!({ "response_action": "update", "view": { "handled_by": "submitted" } }))
    );
    assert_eq!(*seen.lock().unwrap(), vec!["submitted"]);
}

#[tokio::test]
async fn test_handled_without_action_is_empty_ack() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let response = server(&seen)
        .router()
        .oneshot(post(
            "/functions/open_form/view_closed",
            json!({ "type": "view_closed", "view": { "callback_id": "form" }, "is_cleared": true }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, None);
}

#[tokio::test]
async fn test_no_match_is_empty_ack() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let response = server(&seen)
        .router()
        .oneshot(post(
            "/functions/open_form/view_submission",
            json!({ "view": { "callback_id": "unrelated" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, None);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_function_and_category() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = server(&seen).router();
    let payload = json!({ "view": { "callback_id": "form" } });

    let response = app
        .clone()
        .oneshot(post("/functions/nope/view_submission", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(post("/functions/open_form/block_actions", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_callback_id_is_bad_request() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let response = server(&seen)
        .router()
        .oneshot(post("/functions/open_form/view_submission", json!({ "view": {} })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_odd_optional_fields_still_dispatch() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let response = server(&seen)
        .router()
        .oneshot(post(
            "/functions/open_form/view_submission",
            json!({
                "view": { "callback_id": "form", "hash": 1 },
                "function_data": { "execution_id": "Fx1", "function": { "id": "Fn1" } },
                "is_cleared": "no"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*seen.lock().unwrap(), vec!["submitted"]);
}

#[tokio::test]
async fn test_body_limit_above_extractor_default() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let config = ServerConfig {
        max_body_bytes: 8 * 1024 * 1024,
        ..ServerConfig::default()
    };
    let metadata = "x".repeat(3 * 1024 * 1024);
    let response = server_with(config, &seen)
        .router()
        .oneshot(post(
            "/functions/open_form/view_submission",
            json!({ "view": { "callback_id": "form", "private_metadata": metadata } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*seen.lock().unwrap(), vec!["submitted"]);
}

#[tokio::test]
async fn test_body_over_limit_is_rejected() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let config = ServerConfig {
        max_body_bytes: 1024,
        ..ServerConfig::default()
    };
    let metadata = "x".repeat(4096);
    let response = server_with(config, &seen)
        .router()
        .oneshot(post(
            "/functions/open_form/view_submission",
            json!({ "view": { "callback_id": "form", "private_metadata": metadata } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_handler_failure_is_server_error() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let response = server(&seen)
        .router()
        .oneshot(post(
            "/functions/open_form/view_submission",
            json!({ "view": { "callback_id": "broken" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let response = server(&seen)
        .router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_serves_over_tcp_until_shutdown() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let handle = tokio::spawn(server(&seen).run_until(listener, async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let response = client
        .post(format!("http://{}/functions/open_form/view_submission", addr))
        .json(&json!({ "view": { "callback_id": "form" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["response_action"], "update");

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

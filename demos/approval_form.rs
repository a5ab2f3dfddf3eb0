//! Two-step approval form served over the delivery endpoint.
//!
//! Run with `SLACK_BOT_TOKEN=xoxb-... cargo run --example approval_form [config.toml]`.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use surface_router::config::{load_config, AppConfig};
use surface_router::functions::builtin;
use surface_router::observability::init_logging;
use surface_router::routing::{handler_fn, Constraint, HandlerError, ViewContext};
use surface_router::{ApiClient, DeliveryServer, ResponseAction, ViewRouter};

fn details_view() -> Value {
    json!({
        "type": "modal",
        "callback_id": "approval_details",
        "title": { "type": "plain_text", "text": "Request details" },
        "submit": { "type": "plain_text", "text": "Send" },
        "blocks": [{
            "type": "input",
            "block_id": "reason",
            "label": { "type": "plain_text", "text": "Reason" },
            "element": { "type": "plain_text_input", "action_id": "reason" }
        }]
    })
}

fn submitted_text(ctx: &ViewContext, block: &str) -> Option<String> {
    ctx.event
        .state_values()?
        .get(block)?
        .get(block)?
        .get("value")?
        .as_str()
        .map(str::to_string)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => AppConfig::default(),
    };
    init_logging(&config.logging)?;

    let client = Arc::new(ApiClient::new(&config.api)?);

    let router = ViewRouter::for_function(&builtin::open_form())
        .view_submission(
            "approval_start",
            handler_fn(|_ctx: ViewContext| async move { Ok(Some(ResponseAction::push(details_view()))) }),
        )
        .view_submission(
            "approval_details",
            handler_fn(|ctx: ViewContext| async move {
                let Some(reason) = submitted_text(&ctx, "reason").filter(|r| !r.trim().is_empty()) else {
                    return Ok(Some(ResponseAction::errors([("reason", "Please give a reason")])));
                };
                let execution_id = ctx
                    .event
                    .execution_id()
                    .ok_or_else(|| HandlerError::InvalidPayload("missing function_data.execution_id".into()))?
                    .to_string();

                let mut outputs = Map::new();
                outputs.insert("fields".into(), json!({ "reason": reason }));
                if let Some(interactivity) = &ctx.event.interactivity {
                    outputs.insert("interactivity".into(), serde_json::to_value(interactivity).unwrap_or_default());
                }
                let missing = builtin::open_form().output_parameters.missing_required(&outputs);
                if !missing.is_empty() {
                    ctx.client
                        .complete_error(&execution_id, &format!("missing outputs: {}", missing.join(", ")))
                        .await?;
                    return Ok(Some(ResponseAction::clear()));
                }
                ctx.client.complete_success(&execution_id, outputs).await?;
                Ok(Some(ResponseAction::clear()))
            }),
        )
        .view_closed(
            Constraint::pattern("^approval_")?,
            handler_fn(|ctx: ViewContext| async move {
                if let Some(execution_id) = ctx.event.execution_id() {
                    ctx.client.complete_error(execution_id, "Form was closed").await?;
                }
                Ok(None)
            }),
        );

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    DeliveryServer::new(config.server.clone(), client, [router])
        .run(listener)
        .await?;
    Ok(())
}

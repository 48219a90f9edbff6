//! HTTP request handlers
//!
//! This module contains the webhook receiver and the health check.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    errors::ApiError,
    payloads::{IssueCommentPayload, PullRequestPayload},
    signature::{verify_signature, SIGNATURE_HEADER},
    AppState,
};

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

/// Header naming the webhook event type.
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the unique delivery ID.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Response to an accepted webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    /// "processed", "ignored" or "pong"
    pub status: String,

    /// The event type of the delivery
    pub event: String,
}

impl WebhookResponse {
    fn new(status: &str, event: &str) -> Self {
        Self {
            status: status.to_string(),
            event: event.to_string(),
        }
    }
}

/// POST /webhook
///
/// Receives a GitHub webhook delivery.
///
/// # Responses
///
/// - 200 when the event was handled, or filtered out as not relevant
/// - 202 for event types the bot does not handle
/// - 400 for deliveries without an event type or with a malformed payload
/// - 401 when the signature does not match the configured secret
/// - 500 when handling the event failed
#[instrument(skip_all, fields(event = tracing::field::Empty, delivery = tracing::field::Empty))]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), ApiError> {
    if let Some(secret) = &state.webhook_secret {
        let signature = header_value(&headers, SIGNATURE_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("Missing signature header".to_string()))?;

        if !verify_signature(&body, signature, secret) {
            return Err(ApiError::Unauthorized("Signature mismatch".to_string()));
        }
    }

    let event = header_value(&headers, EVENT_HEADER)
        .ok_or_else(|| ApiError::BadRequest("Missing X-GitHub-Event header".to_string()))?
        .to_string();

    let span = tracing::Span::current();
    span.record("event", event.as_str());
    if let Some(delivery) = header_value(&headers, DELIVERY_HEADER) {
        span.record("delivery", delivery);
    }

    match event.as_str() {
        "ping" => {
            info!("Received ping");
            Ok((StatusCode::OK, Json(WebhookResponse::new("pong", &event))))
        }
        "issue_comment" => {
            let payload: IssueCommentPayload = parse_payload(&body)?;
            if !payload.is_actionable() {
                debug!(
                    action = %payload.action,
                    state = %payload.issue.state,
                    "Ignoring comment event"
                );
                return Ok((StatusCode::OK, Json(WebhookResponse::new("ignored", &event))));
            }

            state.bot.handle_comment(&payload.to_event()).await?;
            Ok((StatusCode::OK, Json(WebhookResponse::new("processed", &event))))
        }
        "pull_request" => {
            let payload: PullRequestPayload = parse_payload(&body)?;

            state.bot.handle_pull_request(&payload.to_event()).await?;
            Ok((StatusCode::OK, Json(WebhookResponse::new("processed", &event))))
        }
        other => {
            debug!(event = other, "Ignoring unsupported event");
            Ok((
                StatusCode::ACCEPTED,
                Json(WebhookResponse::new("ignored", &event)),
            ))
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_payload<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// GET /health
///
/// Health check endpoint.
///
/// Returns service health status with version and timestamp.
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Service status
    pub status: String,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Current timestamp (ISO 8601)
    pub timestamp: String,
}

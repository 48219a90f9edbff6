//! Tests for handlers module

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::{
    routes::create_router,
    signature::compute_signature,
    test_support::{app_state, RecordingClient, SECRET},
};

fn comment_body(action: &str, body: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "action": action,
        "issue": { "number": 3, "state": "open" },
        "comment": { "body": body, "user": { "login": "octocat" } },
        "repository": { "name": "my-repo", "owner": { "login": "my-org" } }
    }))
    .unwrap()
}

fn pull_request_body(action: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "action": action,
        "number": 9,
        "pull_request": { "number": 9, "labels": [] },
        "repository": { "name": "my-repo", "owner": { "login": "my-org" } }
    }))
    .unwrap()
}

fn delivery(event: &str, body: Vec<u8>, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header(EVENT_HEADER, event)
        .header(DELIVERY_HEADER, "72d3162e-cc78-11e3-81ab-4c9367dc0958");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body)).unwrap()
}

fn signed(event: &str, body: Vec<u8>) -> Request<Body> {
    let signature = compute_signature(&body, SECRET);
    delivery(event, body, Some(signature))
}

fn app(client: &Arc<RecordingClient>) -> Router {
    create_router(app_state(client.clone(), Some(SECRET)))
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check_returns_json() {
    let response = health_check().await;

    assert_eq!(response.0.status, "healthy");
    assert_eq!(response.0.version, Some(env!("CARGO_PKG_VERSION").to_string()));
    assert!(chrono::DateTime::parse_from_rfc3339(&response.0.timestamp).is_ok());
}

#[tokio::test]
async fn test_label_command_is_applied() {
    let client = Arc::new(RecordingClient::default());

    let response = app(&client)
        .oneshot(signed("issue_comment", comment_body("created", "/label kind/bug")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "processed");
    assert_eq!(client.added(), vec!["3:kind/bug"]);
}

#[tokio::test]
async fn test_edited_comment_is_ignored() {
    let client = Arc::new(RecordingClient::default());

    let response = app(&client)
        .oneshot(signed("issue_comment", comment_body("edited", "/label kind/bug")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ignored");
    assert!(client.added().is_empty());
}

#[tokio::test]
async fn test_opened_pull_request_gets_squash_label() {
    let client = Arc::new(RecordingClient::default());

    let response = app(&client)
        .oneshot(signed("pull_request", pull_request_body("opened")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(client.added(), vec!["9:stat/needs-squash"]);
}

#[tokio::test]
async fn test_missing_signature_is_rejected() {
    let client = Arc::new(RecordingClient::default());

    let response = app(&client)
        .oneshot(delivery(
            "issue_comment",
            comment_body("created", "/label kind/bug"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(client.added().is_empty());
}

#[tokio::test]
async fn test_invalid_signature_is_rejected() {
    let client = Arc::new(RecordingClient::default());
    let body = comment_body("created", "/label kind/bug");
    let signature = compute_signature(b"something else", SECRET);

    let response = app(&client)
        .oneshot(delivery("issue_comment", body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"]["code"], "AuthenticationError");
}

#[tokio::test]
async fn test_signature_not_required_without_secret() {
    let client = Arc::new(RecordingClient::default());
    let app = create_router(app_state(client.clone(), None));

    let response = app
        .oneshot(delivery(
            "issue_comment",
            comment_body("created", "/label kind/bug"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(client.added(), vec!["3:kind/bug"]);
}

#[tokio::test]
async fn test_ping_is_answered() {
    let client = Arc::new(RecordingClient::default());

    let response = app(&client)
        .oneshot(signed("ping", br#"{"zen":"Keep it logically awesome."}"#.to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "pong");
}

#[tokio::test]
async fn test_unsupported_event_is_accepted_and_ignored() {
    let client = Arc::new(RecordingClient::default());

    let response = app(&client)
        .oneshot(signed("push", b"{}".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let client = Arc::new(RecordingClient::default());

    let response = app(&client)
        .oneshot(signed("issue_comment", b"{\"action\":".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_event_header_is_bad_request() {
    let client = Arc::new(RecordingClient::default());
    let body = b"{}".to_vec();
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(SIGNATURE_HEADER, compute_signature(&body, SECRET))
        .body(Body::from(body))
        .unwrap();

    let response = app(&client).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bot_failure_is_internal_error() {
    let client = Arc::new(RecordingClient {
        fail: true,
        ..Default::default()
    });

    let response = app(&client)
        .oneshot(signed("issue_comment", comment_body("created", "/label kind/bug")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["code"], "InternalError");
}

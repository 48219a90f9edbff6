//! Tests for routes module

use super::*;
use crate::test_support::{app_state, RecordingClient};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_route() {
    let router = create_router(app_state(Arc::new(RecordingClient::default()), None));

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let router = create_router(app_state(Arc::new(RecordingClient::default()), None));

    let response = router
        .oneshot(Request::builder().uri("/api/v1/repositories").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_webhook_requires_post() {
    let router = create_router(app_state(Arc::new(RecordingClient::default()), None));

    let response = router
        .oneshot(Request::builder().uri("/webhook").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

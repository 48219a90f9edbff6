//! HTTP middleware

use axum::{extract::Request, middleware::Next, response::Response};

use crate::handlers::DELIVERY_HEADER;

/// Request tracing middleware.
///
/// Logs every request with an ID. GitHub deliveries are identified by their delivery
/// ID; other requests get a generated one.
pub async fn tracing_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(DELIVERY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        "Request started"
    );

    let response = next.run(request).await;

    tracing::info!(
        request_id = %request_id,
        status = %response.status(),
        "Request completed"
    );

    response
}

//! Tests for errors module

use super::*;
use http_body_util::BodyExt;

async fn body_of(error: ApiError) -> (StatusCode, ErrorResponse) {
    let response = error.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_unauthorized_maps_to_401() {
    let (status, body) = body_of(ApiError::Unauthorized("missing signature".to_string())).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.error.code, "AuthenticationError");
    assert!(body.error.message.contains("missing signature"));
}

#[tokio::test]
async fn test_bad_request_maps_to_400() {
    let (status, body) = body_of(ApiError::BadRequest("not json".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error.code, "ValidationError");
}

#[tokio::test]
async fn test_bot_errors_hide_details() {
    let error = ApiError::from(LabelBotError::GitHub(github_client::Error::RateLimitExceeded));

    let (status, body) = body_of(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error.code, "InternalError");
    assert!(!body.error.message.contains("Rate limit"));
}

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        error: ErrorDetails {
            code: "ValidationError".to_string(),
            message: "bad".to_string(),
        },
    };

    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["error"]["code"], "ValidationError");
    assert_eq!(json["error"]["message"], "bad");
}

//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when interacting with the GitHub API
//! through the github_client crate. The label bot treats every variant as an upstream failure
//! of the event that triggered the call.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// This enum represents the error conditions when working with the GitHub API,
/// including authentication failures, API errors, rate limiting, and data processing issues.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.list_repository_labels("my-org", "my-repo").await {
///     Ok(labels) => println!("Repository has {} labels", labels.len()),
///     Err(Error::NotFound) => eprintln!("Repository not found"),
///     Err(Error::RateLimitExceeded) => eprintln!("Rate limit exceeded, retry later"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when:
    /// - GitHub App credentials are invalid or expired
    /// - Network connectivity issues prevent authentication
    /// - The GitHub App lacks necessary permissions
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GitHub API returned an error or a response in an unexpected format.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// Returned when the API answers with a 404 status code, for example when the
    /// repository, issue or label does not exist or is not visible to the app.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    ///
    /// The bot never retries; the webhook delivery may be redelivered later.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

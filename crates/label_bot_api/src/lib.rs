//! Label Bot webhook API
//!
//! This crate receives GitHub webhook deliveries and hands them to the label bot.
//!
//! # Architecture
//!
//! This crate exists in the HTTP layer and handles:
//! - Webhook signature verification
//! - Translation of webhook payloads into label bot events
//! - Error mapping from domain to HTTP
//! - Routing and server configuration
//!
//! The dependency flows: HTTP API → Business Logic, never the reverse.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod payloads;
pub mod routes;
pub mod server;
pub mod signature;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use label_bot_core::LabelBot;

// Re-export key types for convenience
pub use errors::{ApiError, ErrorResponse};
pub use server::{resolve_webhook_secret, ApiConfig, ApiServer};

/// Default API port
pub const DEFAULT_PORT: u16 = 8080;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The label bot that handles the events
    pub bot: Arc<LabelBot>,

    /// Secret used to sign webhook deliveries. Signatures are not checked when unset.
    pub webhook_secret: Option<Arc<str>>,
}

impl AppState {
    /// Create new application state
    ///
    /// # Arguments
    ///
    /// * `bot` - The label bot
    /// * `webhook_secret` - The webhook secret configured on the GitHub App or repository
    pub fn new(bot: LabelBot, webhook_secret: Option<String>) -> Self {
        Self {
            bot: Arc::new(bot),
            webhook_secret: webhook_secret
                .filter(|s| !s.is_empty())
                .map(Arc::from),
        }
    }
}

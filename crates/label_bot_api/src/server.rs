//! HTTP server configuration and startup
//!
//! This module provides the main server configuration and startup logic.

use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

use crate::{routes, AppState, DEFAULT_PORT};

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl ApiConfig {
    /// Builds the configuration from `API_HOST` and `API_PORT` values.
    ///
    /// Missing values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the port is not a valid port number.
    pub fn from_values(host: Option<String>, port: Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match port {
            Some(port) => port
                .parse()
                .with_context(|| format!("Invalid API_PORT '{}'", port))?,
            None => defaults.port,
        };

        Ok(Self {
            port,
            host: host.unwrap_or(defaults.host),
        })
    }
}

/// Resolves the webhook secret from `WEBHOOK_SECRET` and `ALLOW_UNSIGNED_WEBHOOKS` values.
///
/// Without a secret anyone who can reach the server can change labels, so an empty or
/// missing secret is only accepted when unsigned deliveries are explicitly allowed.
///
/// # Errors
///
/// Returns an error if there is no secret and unsigned deliveries are not allowed, or if
/// the opt-out value is not a boolean.
pub fn resolve_webhook_secret(
    secret: Option<String>,
    allow_unsigned: Option<String>,
) -> anyhow::Result<Option<String>> {
    if let Some(secret) = secret.filter(|s| !s.is_empty()) {
        return Ok(Some(secret));
    }

    let allow_unsigned = match allow_unsigned {
        Some(value) => value
            .trim()
            .parse::<bool>()
            .with_context(|| format!("Invalid ALLOW_UNSIGNED_WEBHOOKS '{}'", value))?,
        None => false,
    };

    if !allow_unsigned {
        anyhow::bail!(
            "WEBHOOK_SECRET must be set; set ALLOW_UNSIGNED_WEBHOOKS=true to accept unsigned deliveries"
        );
    }

    tracing::warn!("WEBHOOK_SECRET is not set, webhook signatures will not be verified");
    Ok(None)
}

/// API server
pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server with the given configuration.
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the Axum router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Start the server and listen for requests.
    ///
    /// This method blocks until the server is shut down gracefully via
    /// CTRL+C (SIGINT) or SIGTERM signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from((
            self.config
                .host
                .parse::<std::net::IpAddr>()
                .with_context(|| format!("Invalid API_HOST '{}'", self.config.host))?,
            self.config.port,
        ));

        tracing::info!("Starting API server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        let app = self.router();

        // Serve with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Wait for shutdown signal (CTRL+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

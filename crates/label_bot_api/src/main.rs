//! Label Bot webhook server
//!
//! Main binary for running the label bot.
//!
//! # Environment Variables
//!
//! - `API_PORT`: Port to listen on (default: 8080)
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `RUST_LOG`: Log level (default: info)
//! - `LABEL_BOT_CONFIG`: Path of the bot configuration (default: label-bot.toml)
//! - `WEBHOOK_SECRET`: Secret used to verify webhook signatures (required)
//! - `ALLOW_UNSIGNED_WEBHOOKS`: Set to `true` to run without `WEBHOOK_SECRET`
//! - `GITHUB_TOKEN`: Personal access token, or
//! - `GITHUB_APP_ID`, `GITHUB_APP_PRIVATE_KEY_PATH` and `GITHUB_INSTALLATION_ID` for a GitHub App

use std::{env, path::PathBuf, sync::Arc};

use anyhow::Context;
use config_manager::BotConfig;
use github_client::{
    create_app_client, create_installation_client, create_token_client, GitHubClient,
};
use label_bot_api::{resolve_webhook_secret, ApiConfig, ApiServer, AppState};
use label_bot_core::LabelBot;
use octocrab::Octocrab;

const DEFAULT_CONFIG_PATH: &str = "label-bot.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = ApiConfig::from_values(env::var("API_HOST").ok(), env::var("API_PORT").ok())?;

    let config_path = PathBuf::from(
        env::var("LABEL_BOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
    );
    let bot_config = BotConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let webhook_secret = resolve_webhook_secret(
        env::var("WEBHOOK_SECRET").ok(),
        env::var("ALLOW_UNSIGNED_WEBHOOKS").ok(),
    )?;

    let client = GitHubClient::new(create_octocrab().await?);
    let bot = LabelBot::new(Arc::new(client), bot_config);

    let state = AppState::new(bot, webhook_secret);
    let server = ApiServer::new(config, state);

    tracing::info!(
        config = %config_path.display(),
        "Starting label bot server"
    );

    // Start server with graceful shutdown
    server.serve().await
}

async fn create_octocrab() -> anyhow::Result<Octocrab> {
    if let Ok(token) = env::var("GITHUB_TOKEN") {
        tracing::info!("Authenticating with a personal access token");
        return Ok(create_token_client(&token)?);
    }

    let app_id: u64 = env::var("GITHUB_APP_ID")
        .context("Either GITHUB_TOKEN or GITHUB_APP_ID must be set")?
        .parse()
        .context("Invalid GITHUB_APP_ID")?;
    let key_path = env::var("GITHUB_APP_PRIVATE_KEY_PATH")
        .context("GITHUB_APP_PRIVATE_KEY_PATH must be set")?;
    let installation_id: u64 = env::var("GITHUB_INSTALLATION_ID")
        .context("GITHUB_INSTALLATION_ID must be set")?
        .parse()
        .context("Invalid GITHUB_INSTALLATION_ID")?;

    let private_key = tokio::fs::read_to_string(&key_path)
        .await
        .with_context(|| format!("Failed to read private key {}", key_path))?;

    let app_client = create_app_client(app_id, &private_key).await?;

    let installation_client = create_installation_client(&app_client, installation_id)?;

    tracing::info!(app_id, installation_id, "Authenticated as GitHub App installation");
    Ok(installation_client)
}

//! Configuration management for the label bot.
//!
//! The configuration names the repositories the bot serves and, per repository,
//! which label policies are enabled:
//!
//! - label creation by collaborators ([`RepositoryConfig::allow_creating_labels_by_collaborator`])
//! - the squash label ([`settings::SquashConfig`])
//! - labels cleared when a pull request's source branch changes ([`settings::ClearLabelConfig`])
//!
//! See [`BotConfig`] for the file format.

pub mod bot_config;
pub mod errors;
pub mod settings;

// Re-export for convenient access
pub use bot_config::{BotConfig, RepositoryConfig, RepositoryMatch, DEFAULT_LABEL_COLOR};
pub use errors::{ConfigurationError, ConfigurationResult};

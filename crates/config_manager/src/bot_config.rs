//! Label bot configuration.
//!
//! The bot reads a single TOML file at start-up. It holds a list of repository
//! entries; each entry names the repositories (or whole owners) it applies to and
//! the label policies for them.
//!
//! # Example TOML Configuration
//!
//! ```toml
//! [[repositories]]
//! repos = ["my-org/my-repo", "other-org"]
//! excluded_repos = ["other-org/legacy"]
//! clear_labels = ["lgtm", "approved"]
//! clear_labels_by_regexp = "^ci/.*"
//! allow_creating_labels_by_collaborator = true
//!
//! [repositories.squash]
//! commits_threshold = 5
//! squash_commit_label = "stat/needs-squash"
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    settings::{ClearLabelConfig, SquashConfig},
    ConfigurationError, ConfigurationResult,
};

/// Default color for labels the bot creates on behalf of collaborators.
pub const DEFAULT_LABEL_COLOR: &str = "ededed";

#[cfg(test)]
#[path = "bot_config_tests.rs"]
mod tests;

/// Top-level label bot configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
}

impl BotConfig {
    /// Builds a configuration from repository entries, validating and compiling each entry.
    pub fn new(repositories: Vec<RepositoryConfig>) -> ConfigurationResult<Self> {
        let mut config = Self { repositories };
        config.compile()?;
        Ok(config)
    }

    /// Loads and validates the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::FileNotFound` if the file does not exist
    /// - `ConfigurationError::FileAccessError` if the file cannot be read
    /// - `ConfigurationError::ParseError` if the file is not valid TOML
    /// - `ConfigurationError::InvalidConfiguration` if validation fails
    pub fn load(path: &Path) -> ConfigurationResult<Self> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(ConfigurationError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content =
            fs::read_to_string(path).map_err(|e| ConfigurationError::FileAccessError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let config = Self::from_toml_str(&content)?;

        info!(
            path = %path.display(),
            entries = config.repositories.len(),
            "Loaded label bot configuration"
        );

        Ok(config)
    }

    /// Parses and validates the configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigurationResult<Self> {
        let mut config: BotConfig =
            toml::from_str(content).map_err(|e| ConfigurationError::ParseError {
                reason: e.to_string(),
            })?;

        config.compile()?;
        Ok(config)
    }

    /// Validates every entry and compiles its clear-label settings.
    fn compile(&mut self) -> ConfigurationResult<()> {
        self.validate()?;

        for entry in &mut self.repositories {
            entry.clear = ClearLabelConfig::new(
                entry.clear_labels.clone(),
                entry.clear_labels_by_regexp.as_deref(),
            )?;
        }

        Ok(())
    }

    /// Validates every repository entry.
    pub fn validate(&self) -> ConfigurationResult<()> {
        for (index, entry) in self.repositories.iter().enumerate() {
            entry.validate().map_err(|e| match e {
                ConfigurationError::InvalidConfiguration { field, reason } => {
                    ConfigurationError::InvalidConfiguration {
                        field: format!("repositories[{}].{}", index, field),
                        reason,
                    }
                }
                other => other,
            })?;
        }

        Ok(())
    }

    /// Finds the configuration entry for a repository.
    ///
    /// An entry listing `owner/repo` wins over an entry listing only `owner`. Entries
    /// that exclude the repository never match. Returns `None` if the repository is
    /// not configured.
    pub fn config_for(&self, owner: &str, repo: &str) -> Option<&RepositoryConfig> {
        let mut owner_match = None;

        for entry in &self.repositories {
            match entry.repository_match(owner, repo) {
                Some(RepositoryMatch::Repository) => return Some(entry),
                Some(RepositoryMatch::Owner) if owner_match.is_none() => {
                    owner_match = Some(entry)
                }
                _ => {}
            }
        }

        owner_match
    }
}

/// How a repository entry matched a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryMatch {
    /// The entry lists the repository by its full name.
    Repository,

    /// The entry lists the repository owner.
    Owner,
}

/// Label policies for a set of repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repositories this entry applies to, as `owner/repo` or `owner`.
    pub repos: Vec<String>,

    /// Repositories (`owner/repo`) excluded even though their owner is listed.
    #[serde(default)]
    pub excluded_repos: Vec<String>,

    /// Labels removed from a pull request when its source branch changes.
    #[serde(default)]
    pub clear_labels: Vec<String>,

    /// Regular expression selecting more labels to remove when the source branch changes.
    #[serde(default)]
    pub clear_labels_by_regexp: Option<String>,

    /// Lets collaborators create missing labels by requesting them.
    #[serde(default)]
    pub allow_creating_labels_by_collaborator: bool,

    /// Color given to labels created on behalf of collaborators.
    #[serde(default = "default_label_color")]
    pub created_label_color: String,

    #[serde(default)]
    pub squash: SquashConfig,

    /// Compiled form of `clear_labels` and `clear_labels_by_regexp`.
    ///
    /// Filled in when the entry becomes part of a [`BotConfig`].
    #[serde(skip)]
    clear: ClearLabelConfig,
}

fn default_label_color() -> String {
    DEFAULT_LABEL_COLOR.to_string()
}

impl RepositoryConfig {
    /// Creates an entry for the given repositories with every policy switched off.
    pub fn for_repos<I, S>(repos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repos: repos.into_iter().map(Into::into).collect(),
            excluded_repos: Vec::new(),
            clear_labels: Vec::new(),
            clear_labels_by_regexp: None,
            allow_creating_labels_by_collaborator: false,
            created_label_color: default_label_color(),
            squash: SquashConfig::default(),
            clear: ClearLabelConfig::default(),
        }
    }

    /// Checks how this entry applies to `owner/repo`, if at all.
    ///
    /// Names are compared case-insensitively, as GitHub does.
    pub fn repository_match(&self, owner: &str, repo: &str) -> Option<RepositoryMatch> {
        let full_name = format!("{}/{}", owner, repo);

        if self
            .excluded_repos
            .iter()
            .any(|r| r.eq_ignore_ascii_case(&full_name))
        {
            return None;
        }

        if self.repos.iter().any(|r| r.eq_ignore_ascii_case(&full_name)) {
            return Some(RepositoryMatch::Repository);
        }

        if self.repos.iter().any(|r| r.eq_ignore_ascii_case(owner)) {
            return Some(RepositoryMatch::Owner);
        }

        None
    }

    /// The compiled clear-label settings of this entry.
    ///
    /// Empty until the entry is loaded through [`BotConfig`].
    pub fn clear_label_config(&self) -> &ClearLabelConfig {
        &self.clear
    }

    /// Validates the entry.
    pub fn validate(&self) -> ConfigurationResult<()> {
        if self.repos.is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                field: "repos".to_string(),
                reason: "At least one repository or owner must be listed".to_string(),
            });
        }

        for name in &self.repos {
            validate_repository_name(name, "repos", true)?;
        }

        for name in &self.excluded_repos {
            validate_repository_name(name, "excluded_repos", false)?;
        }

        if let Some(pattern) = &self.clear_labels_by_regexp {
            regex::Regex::new(pattern).map_err(|e| ConfigurationError::InvalidConfiguration {
                field: "clear_labels_by_regexp".to_string(),
                reason: e.to_string(),
            })?;
        }

        let color = &self.created_label_color;
        if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigurationError::InvalidConfiguration {
                field: "created_label_color".to_string(),
                reason: format!(
                    "'{}' is not a 6 digit hex color code without the leading '#'",
                    color
                ),
            });
        }

        Ok(())
    }
}

/// Checks a repository reference of the form `owner/repo`, or `owner` if allowed.
fn validate_repository_name(name: &str, field: &str, allow_owner: bool) -> ConfigurationResult<()> {
    let parts: Vec<&str> = name.split('/').collect();
    let valid = match parts.as_slice() {
        [owner] => allow_owner && !owner.trim().is_empty(),
        [owner, repo] => !owner.trim().is_empty() && !repo.trim().is_empty(),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        let expected = if allow_owner {
            "'owner' or 'owner/repo'"
        } else {
            "'owner/repo'"
        };
        Err(ConfigurationError::InvalidConfiguration {
            field: field.to_string(),
            reason: format!("'{}' must have the form {}", name, expected),
        })
    }
}

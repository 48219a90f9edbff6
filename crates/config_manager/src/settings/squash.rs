//! Squash label configuration.
//!
//! Controls when a pull request is marked as needing its commits squashed.

use serde::{Deserialize, Serialize};

/// Squash label settings.
///
/// A pull request with more commits than `commits_threshold` gets the
/// `squash_commit_label` label. Checking is disabled while either value is unset.
///
/// # Examples
///
/// ```
/// use config_manager::settings::SquashConfig;
///
/// let config: SquashConfig = toml::from_str(r#"
///     commits_threshold = 5
///     squash_commit_label = "stat/needs-squash"
/// "#).unwrap();
///
/// assert!(config.is_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SquashConfig {
    /// Largest commit count that does not need squashing. Zero disables checking.
    #[serde(default)]
    pub commits_threshold: u32,

    /// Name of the label applied when the threshold is exceeded.
    #[serde(default)]
    pub squash_commit_label: String,
}

impl SquashConfig {
    pub fn new(commits_threshold: u32, squash_commit_label: impl Into<String>) -> Self {
        Self {
            commits_threshold,
            squash_commit_label: squash_commit_label.into(),
        }
    }

    /// Returns true when both the threshold and the label name are configured.
    pub fn is_enabled(&self) -> bool {
        self.commits_threshold > 0 && !self.squash_commit_label.trim().is_empty()
    }
}

#[cfg(test)]
#[path = "squash_tests.rs"]
mod tests;

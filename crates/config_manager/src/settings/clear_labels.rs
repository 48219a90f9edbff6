//! Label clearing configuration.
//!
//! Controls which labels are removed from a pull request when its source branch changes.

use regex::Regex;

use crate::{ConfigurationError, ConfigurationResult};

/// The compiled form of a repository's clear-label settings.
///
/// Built from the `clear_labels` and `clear_labels_by_regexp` entries of a
/// [`RepositoryConfig`](crate::RepositoryConfig).
#[derive(Debug, Clone, Default)]
pub struct ClearLabelConfig {
    /// Labels that are always cleared.
    pub labels: Vec<String>,

    /// Additional labels to clear, matched against the label name.
    pub pattern: Option<Regex>,
}

impl ClearLabelConfig {
    /// Compiles the clear-label settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidConfiguration` if the pattern is not a
    /// valid regular expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use config_manager::settings::ClearLabelConfig;
    ///
    /// let config = ClearLabelConfig::new(vec!["lgtm".to_string()], Some("^ci/.*")).unwrap();
    /// assert!(config.pattern.unwrap().is_match("ci/failed"));
    /// ```
    pub fn new(labels: Vec<String>, pattern: Option<&str>) -> ConfigurationResult<Self> {
        let pattern = match pattern.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => Some(Regex::new(p).map_err(|e| ConfigurationError::InvalidConfiguration {
                field: "clear_labels_by_regexp".to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self { labels, pattern })
    }

    /// Returns true when neither explicit labels nor a pattern are configured.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.pattern.is_none()
    }
}

// Patterns compare by their source text.
impl PartialEq for ClearLabelConfig {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
            && self.pattern.as_ref().map(Regex::as_str)
                == other.pattern.as_ref().map(Regex::as_str)
    }
}

impl Eq for ClearLabelConfig {}

#[cfg(test)]
#[path = "clear_labels_tests.rs"]
mod tests;

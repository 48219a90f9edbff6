//! Label domain types.
//!
//! This module contains types representing GitHub issue and pull request labels.

use serde::{Deserialize, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;

/// Represents a label on a repository, issue or pull request.
///
/// Only the name takes part in label reconciliation. The remaining fields GitHub
/// returns are ignored when deserializing.
///
/// # Examples
///
/// ```
/// use github_client::Label;
///
/// let label = Label {
///     name: "bug".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The name of the label
    pub name: String,
}

/// Represents the payload for creating a repository label via the REST API.
///
/// # Examples
///
/// ```
/// use github_client::LabelCreatePayload;
///
/// let payload = LabelCreatePayload::new("kind/typo", "ededed");
/// assert_eq!(payload.name, "kind/typo");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct LabelCreatePayload {
    pub name: String,

    /// Hex color code without the leading `#`.
    pub color: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelCreatePayload {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            description: None,
        }
    }
}

/// The outcome of removing several labels from an issue or pull request.
///
/// Labels are removed one at a time, so a failure for one label leaves the others
/// unaffected.
#[derive(Debug, Default)]
pub struct LabelRemoval {
    /// Labels that were applied and have been removed, in request order.
    pub removed: Vec<String>,

    /// Labels that were not applied, so there was nothing to remove.
    pub not_applied: Vec<String>,

    /// Labels that could not be removed, with the error GitHub returned.
    pub failures: Vec<(String, Error)>,
}

impl LabelRemoval {
    /// Returns true if no removal failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

//! Maintenance of the "squash recommended" label on pull requests.

use config_manager::settings::SquashConfig;

use crate::{events::PullRequestAction, label_set::LabelSet};

#[cfg(test)]
#[path = "squash_tests.rs"]
mod tests;

/// The change the squash policy asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquashTransition {
    AddLabel(String),
    RemoveLabel(String),
    NoChange,
}

/// Toggles the squash label based on the commit count of a pull request.
#[derive(Debug, Clone)]
pub struct SquashLabelPolicy {
    config: SquashConfig,
}

impl SquashLabelPolicy {
    pub fn new(config: SquashConfig) -> Self {
        Self { config }
    }

    /// Returns true if the policy is enabled and should run for `action`.
    ///
    /// The label is evaluated when a pull request is opened and whenever its source
    /// branch changes.
    pub fn applies_to(&self, action: &PullRequestAction) -> bool {
        self.config.is_enabled()
            && matches!(
                action,
                PullRequestAction::Opened | PullRequestAction::SourceBranchChanged
            )
    }

    /// Decides whether the label should be added or removed.
    ///
    /// More commits than the threshold require the label; at or below the threshold it
    /// must be absent. The label is matched case-insensitively and removed in the
    /// spelling it is applied with.
    pub fn evaluate(&self, current: &LabelSet, commit_count: u64) -> SquashTransition {
        let label = &self.config.squash_commit_label;
        let threshold = u64::from(self.config.commits_threshold);

        match current.original_name(label) {
            None if commit_count > threshold => SquashTransition::AddLabel(label.clone()),
            Some(applied) if commit_count <= threshold => {
                SquashTransition::RemoveLabel(applied.to_string())
            }
            _ => SquashTransition::NoChange,
        }
    }
}

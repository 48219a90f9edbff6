//! Clearing of labels when a pull request's source branch changes.

use config_manager::settings::ClearLabelConfig;

use crate::label_set::LabelSet;

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;

/// Selects the labels to remove after the source branch of a pull request changed.
#[derive(Debug, Clone)]
pub struct ClearLabelPolicy {
    config: ClearLabelConfig,
}

impl ClearLabelPolicy {
    pub fn new(config: ClearLabelConfig) -> Self {
        Self { config }
    }

    /// Returns the applied labels that must be cleared, in their applied spelling.
    ///
    /// Labels named in the configuration come first, followed by the other applied labels
    /// matching the configured pattern.
    pub fn labels_to_clear(&self, current: &LabelSet) -> Vec<String> {
        let explicit = LabelSet::new(&self.config.labels);

        let mut labels: Vec<String> = current
            .iter()
            .filter(|name| explicit.contains(name))
            .map(str::to_string)
            .collect();

        if let Some(pattern) = &self.config.pattern {
            labels.extend(
                current
                    .iter()
                    .filter(|name| !explicit.contains(name) && pattern.is_match(name))
                    .map(str::to_string),
            );
        }

        labels
    }
}

/// Comment posted after labels were cleared.
pub fn clear_comment(labels: &[String]) -> String {
    format!(
        "This pull request source branch has changed, so removes the following label(s): {}.",
        labels.join(", ")
    )
}

//! Decides whether missing labels may be created for a commenter.

use config_manager::RepositoryConfig;
use tracing::debug;

use crate::{target::RepositoryLabels, LabelBotResult};

#[cfg(test)]
#[path = "collaborator_gate_tests.rs"]
mod tests;

/// Authorizes label creation on behalf of commenters.
///
/// Creation requires both the repository setting and write access of the commenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollaboratorGate {
    allow_creation: bool,
}

impl CollaboratorGate {
    pub fn new(allow_creation: bool) -> Self {
        Self { allow_creation }
    }

    pub fn from_config(config: &RepositoryConfig) -> Self {
        Self::new(config.allow_creating_labels_by_collaborator)
    }

    /// Returns true if the bot may create labels requested by `commenter`.
    ///
    /// The platform is only asked about the commenter when creation is enabled.
    ///
    /// # Errors
    ///
    /// Returns the upstream error if the permission lookup fails.
    pub async fn may_create_labels<R>(&self, commenter: &str, repository: &R) -> LabelBotResult<bool>
    where
        R: RepositoryLabels + ?Sized,
    {
        if !self.allow_creation {
            debug!("Label creation by collaborators is disabled");
            return Ok(false);
        }

        let allowed = repository.is_collaborator(commenter).await?;
        debug!(commenter = commenter, allowed, "Checked label creation permission");

        Ok(allowed)
    }
}

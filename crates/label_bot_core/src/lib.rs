//! # Label Bot Core
//!
//! This crate holds the label reconciliation engine of the label bot. Given an event on
//! an issue or pull request, it decides which labels are added, removed, created or
//! reported, and carries out the result through a [`LabelClient`].
//!
//! ## Overview
//!
//! The bot reacts to two kinds of events:
//!
//! - Comments containing `/label` and `/remove-label` commands ([`LabelBot::handle_comment`])
//! - Pull request lifecycle events ([`LabelBot::handle_pull_request`]), which maintain the
//!   squash label and clear labels when the source branch changes
//!
//! No state is kept between events. Every decision is made from the labels the platform
//! reports at the time of the event.
//!
//! ## Error Handling
//!
//! The independent parts of an event (adding, removing, the squash label and label
//! clearing) are all attempted; their failures are reported together as
//! [`LabelBotError::Multiple`]. Conflicting or unsatisfiable requests are answered with a
//! comment and are not errors.

use std::sync::Arc;

use config_manager::{BotConfig, RepositoryConfig};
use github_client::LabelClient;
use tracing::{debug, info, instrument, warn};

mod errors;
pub use errors::{ErrorCollector, LabelBotError, LabelBotResult};

pub mod clear;
pub mod collaborator_gate;
pub mod command;
pub mod events;
pub mod label_set;
pub mod reconciler;
pub mod squash;
pub mod target;

pub use clear::{clear_comment, ClearLabelPolicy};
pub use collaborator_gate::CollaboratorGate;
pub use command::{parse_label_command, LabelCommand};
pub use events::{
    CommentEvent, LabelCommandEvent, PullRequestAction, PullRequestEvent, RepositoryRef,
    TargetKind, TargetRef,
};
pub use label_set::{normalize, LabelSet};
pub use reconciler::{AddResolution, Classification};
pub use squash::{SquashLabelPolicy, SquashTransition};
pub use target::{
    AdvisoryFailure, IssueTarget, LabelCreationReport, LabelTarget, PullRequestTarget,
    Repository, RepositoryLabels,
};

#[cfg(test)]
mod test_support;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Handles repository events for the configured repositories.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use config_manager::BotConfig;
/// use github_client::{create_token_client, GitHubClient};
/// use label_bot_core::LabelBot;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GitHubClient::new(create_token_client("token")?);
/// let config = BotConfig::load(std::path::Path::new("label-bot.toml"))?;
/// let bot = LabelBot::new(Arc::new(client), config);
/// # Ok(())
/// # }
/// ```
pub struct LabelBot {
    client: Arc<dyn LabelClient>,
    config: BotConfig,
}

impl LabelBot {
    pub fn new(client: Arc<dyn LabelClient>, config: BotConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Handles a new comment, executing any label commands it contains.
    #[instrument(
        skip(self, event),
        fields(
            repo = %event.target.repository,
            number = event.target.number,
            author = %event.author
        )
    )]
    pub async fn handle_comment(&self, event: &CommentEvent) -> LabelBotResult<()> {
        let command = parse_label_command(&event.body);
        if command.is_empty() {
            debug!("Comment contains no label commands");
            return Ok(());
        }

        self.handle_label_command(&LabelCommandEvent {
            target: event.target.clone(),
            author: event.author.clone(),
            add: command.add,
            remove: command.remove,
        })
        .await
    }

    /// Adds and removes the labels requested for an issue or pull request.
    ///
    /// A request that both adds and removes the same label is rejected with a comment
    /// and nothing is changed. Otherwise the additions and removals are carried out
    /// independently and their errors are aggregated.
    #[instrument(
        skip(self, event),
        fields(repo = %event.target.repository, number = event.target.number)
    )]
    pub async fn handle_label_command(&self, event: &LabelCommandEvent) -> LabelBotResult<()> {
        let Some(config) = self.repository_config(&event.target.repository) else {
            return Ok(());
        };

        let add = LabelSet::new(&event.add);
        let remove = LabelSet::new(&event.remove);
        if add.is_empty() && remove.is_empty() {
            return Ok(());
        }

        let repository = self.repository(&event.target.repository, config);
        let target: Box<dyn LabelTarget> = match event.target.kind {
            TargetKind::Issue => Box::new(IssueTarget::new(repository.clone(), event.target.number)),
            TargetKind::PullRequest => Box::new(PullRequestTarget::new(
                repository.clone(),
                event.target.number,
            )),
        };

        let conflict = reconciler::detect_conflict(&add, &remove);
        if !conflict.is_empty() {
            info!(labels = ?conflict, "Labels are both added and removed");
            return target
                .add_comment(&reconciler::conflict_comment(&conflict))
                .await;
        }

        let current = LabelSet::new(target.current_labels().await?);

        let mut errors = ErrorCollector::new();
        if !add.is_empty() {
            let gate = CollaboratorGate::from_config(config);
            errors.record(
                self.add_labels(&repository, target.as_ref(), &add, &current, &event.author, &gate)
                    .await,
            );
        }

        if !remove.is_empty() {
            errors.record(
                self.remove_labels(&repository, target.as_ref(), &remove, &current)
                    .await,
            );
        }

        errors.into_result()
    }

    /// Maintains the squash label and clears labels for a pull request event.
    #[instrument(
        skip(self, event),
        fields(repo = %event.repository, number = event.number, action = ?event.action)
    )]
    pub async fn handle_pull_request(&self, event: &PullRequestEvent) -> LabelBotResult<()> {
        let Some(config) = self.repository_config(&event.repository) else {
            return Ok(());
        };

        let repository = self.repository(&event.repository, config);
        let target = PullRequestTarget::new(repository, event.number);
        let current = LabelSet::new(&event.labels);

        let mut errors = ErrorCollector::new();

        let squash = SquashLabelPolicy::new(config.squash.clone());
        if squash.applies_to(&event.action) {
            errors.record(self.update_squash_label(&target, &squash, &current).await);
        }

        if event.action == PullRequestAction::SourceBranchChanged {
            let clear = config.clear_label_config();
            if !clear.is_empty() {
                let policy = ClearLabelPolicy::new(clear.clone());
                errors.record(self.clear_labels(&target, &policy, &current).await);
            }
        }

        errors.into_result()
    }

    fn repository_config(&self, repository: &RepositoryRef) -> Option<&RepositoryConfig> {
        let config = self.config.config_for(&repository.owner, &repository.name);
        if config.is_none() {
            info!(repo = %repository, "Repository is not configured, ignoring event");
        }
        config
    }

    fn repository(&self, repository: &RepositoryRef, config: &RepositoryConfig) -> Repository {
        Repository::new(self.client.clone(), &repository.owner, &repository.name)
            .with_label_color(&config.created_label_color)
    }

    async fn add_labels(
        &self,
        repository: &Repository,
        target: &dyn LabelTarget,
        add: &LabelSet,
        current: &LabelSet,
        commenter: &str,
        gate: &CollaboratorGate,
    ) -> LabelBotResult<()> {
        let taxonomy = LabelSet::new(repository.repository_labels().await?);
        let classification = reconciler::classify(add, &taxonomy);

        let resolution =
            reconciler::resolve_add(classification, current, commenter, gate, repository).await?;

        let mut errors = ErrorCollector::new();
        if !resolution.to_apply.is_empty() {
            errors.record(target.add_labels(&resolution.to_apply).await);
        } else {
            debug!("All requested labels are already applied");
        }

        if let Some(comment) = &resolution.missing_comment {
            errors.record(target.add_comment(comment).await);
        }

        errors.into_result()
    }

    async fn remove_labels(
        &self,
        repository: &Repository,
        target: &dyn LabelTarget,
        remove: &LabelSet,
        current: &LabelSet,
    ) -> LabelBotResult<()> {
        let taxonomy = LabelSet::new(repository.repository_labels().await?);
        let to_remove = reconciler::resolve_remove(remove, current, &taxonomy);

        if to_remove.is_empty() {
            debug!("None of the labels to remove are applied");
            return Ok(());
        }

        let mut errors = ErrorCollector::new();
        errors.record_removal(target.remove_labels(&to_remove).await);
        errors.into_result()
    }

    async fn update_squash_label(
        &self,
        target: &PullRequestTarget,
        policy: &SquashLabelPolicy,
        current: &LabelSet,
    ) -> LabelBotResult<()> {
        let commit_count = target.commit_count().await.map_err(|e| {
            warn!(error = %e, "Failed to get the commit count, skipping the squash label");
            e
        })?;

        match policy.evaluate(current, commit_count) {
            SquashTransition::AddLabel(label) => {
                info!(label = %label, commit_count, "Adding squash label");
                target.add_labels(&[label]).await
            }
            SquashTransition::RemoveLabel(label) => {
                info!(label = %label, commit_count, "Removing squash label");
                let mut errors = ErrorCollector::new();
                errors.record_removal(target.remove_labels(&[label]).await);
                errors.into_result()
            }
            SquashTransition::NoChange => Ok(()),
        }
    }

    async fn clear_labels(
        &self,
        target: &PullRequestTarget,
        policy: &ClearLabelPolicy,
        current: &LabelSet,
    ) -> LabelBotResult<()> {
        let labels = policy.labels_to_clear(current);
        if labels.is_empty() {
            return Ok(());
        }

        info!(labels = ?labels, "Clearing labels after source branch change");

        let mut errors = ErrorCollector::new();
        let removed = errors.record_removal(target.remove_labels(&labels).await);

        if removed.is_empty() {
            debug!("No labels were removed, skipping the comment");
        } else {
            errors.record(target.add_comment(&clear_comment(&removed)).await);
        }

        errors.into_result()
    }
}

//! Label capabilities of repositories, issues and pull requests.
//!
//! The reconciliation logic only talks to the [`RepositoryLabels`] and [`LabelTarget`]
//! traits. [`IssueTarget`] and [`PullRequestTarget`] implement [`LabelTarget`] on top of a
//! [`LabelClient`], so the same algorithms serve both kinds of target.

use std::sync::Arc;

use async_trait::async_trait;
use config_manager::DEFAULT_LABEL_COLOR;
use github_client::{LabelClient, LabelCreatePayload, LabelRemoval};
use tracing::{debug, info, instrument, warn};

use crate::LabelBotResult;

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;

/// Label operations on a repository.
#[async_trait]
pub trait RepositoryLabels: Send + Sync {
    /// Names of all labels declared on the repository.
    async fn repository_labels(&self) -> LabelBotResult<Vec<String>>;

    /// Returns true if the user may write to the repository.
    async fn is_collaborator(&self, username: &str) -> LabelBotResult<bool>;

    /// Declares the given labels on the repository.
    ///
    /// Creation is best-effort: labels that cannot be created are reported in the
    /// returned [`LabelCreationReport`] and never fail the call.
    async fn create_labels(&self, names: &[String]) -> LabelCreationReport;
}

/// Label operations on an issue or a pull request.
#[async_trait]
pub trait LabelTarget: Send + Sync {
    /// The issue or pull request number.
    fn number(&self) -> u64;

    /// Names of the labels currently applied.
    async fn current_labels(&self) -> LabelBotResult<Vec<String>>;

    async fn add_labels(&self, names: &[String]) -> LabelBotResult<()>;

    /// Removes the given labels, continuing past labels that cannot be removed.
    async fn remove_labels(&self, names: &[String]) -> LabelRemoval;

    async fn add_comment(&self, body: &str) -> LabelBotResult<()>;
}

/// The outcome of a best-effort label creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCreationReport {
    /// Names of the labels that were created, as the platform reports them.
    pub created: Vec<String>,

    /// Labels that could not be created.
    pub failures: Vec<AdvisoryFailure>,
}

impl LabelCreationReport {
    /// Names of the labels that could not be created.
    pub fn failed_labels(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.label.clone()).collect()
    }
}

/// A failure that is reported but does not fail the surrounding operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryFailure {
    pub label: String,
    pub reason: String,
}

/// A repository on the hosting platform.
#[derive(Clone)]
pub struct Repository {
    client: Arc<dyn LabelClient>,
    owner: String,
    name: String,
    label_color: String,
}

impl Repository {
    pub fn new(client: Arc<dyn LabelClient>, owner: &str, name: &str) -> Self {
        Self {
            client,
            owner: owner.to_string(),
            name: name.to_string(),
            label_color: DEFAULT_LABEL_COLOR.to_string(),
        }
    }

    /// Sets the color used for labels created in this repository.
    pub fn with_label_color(mut self, color: &str) -> Self {
        self.label_color = color.to_string();
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The repository name in `owner/name` form.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("label_color", &self.label_color)
            .finish()
    }
}

#[async_trait]
impl RepositoryLabels for Repository {
    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.name))]
    async fn repository_labels(&self) -> LabelBotResult<Vec<String>> {
        let labels = self
            .client
            .list_repository_labels(&self.owner, &self.name)
            .await?;

        debug!(count = labels.len(), "Fetched repository labels");
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.name))]
    async fn is_collaborator(&self, username: &str) -> LabelBotResult<bool> {
        let permission = self
            .client
            .get_collaborator_permission(&self.owner, &self.name, username)
            .await?;

        debug!(
            permission = %permission.permission,
            "Fetched collaborator permission"
        );
        Ok(permission.has_write_access())
    }

    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.name))]
    async fn create_labels(&self, names: &[String]) -> LabelCreationReport {
        let mut report = LabelCreationReport::default();

        for name in names {
            let payload = LabelCreatePayload::new(name.as_str(), self.label_color.as_str());
            match self
                .client
                .create_repository_label(&self.owner, &self.name, &payload)
                .await
            {
                Ok(label) => {
                    info!(label = %label.name, "Created repository label");
                    report.created.push(label.name);
                }
                Err(e) => {
                    warn!(label = %name, error = %e, "Failed to create repository label");
                    report.failures.push(AdvisoryFailure {
                        label: name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

/// An issue in a repository.
#[derive(Debug, Clone)]
pub struct IssueTarget {
    repository: Repository,
    number: u64,
}

impl IssueTarget {
    pub fn new(repository: Repository, number: u64) -> Self {
        Self { repository, number }
    }
}

#[async_trait]
impl LabelTarget for IssueTarget {
    fn number(&self) -> u64 {
        self.number
    }

    async fn current_labels(&self) -> LabelBotResult<Vec<String>> {
        let repo = &self.repository;
        let labels = repo
            .client
            .list_issue_labels(&repo.owner, &repo.name, self.number)
            .await?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    #[instrument(skip(self), fields(repo = %self.repository.full_name(), number = self.number))]
    async fn add_labels(&self, names: &[String]) -> LabelBotResult<()> {
        let repo = &self.repository;
        repo.client
            .add_issue_labels(&repo.owner, &repo.name, self.number, names)
            .await?;
        info!("Added labels to issue");
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.repository.full_name(), number = self.number))]
    async fn remove_labels(&self, names: &[String]) -> LabelRemoval {
        let repo = &self.repository;
        let removal = repo
            .client
            .remove_issue_labels(&repo.owner, &repo.name, self.number, names)
            .await;
        info!(
            removed = ?removal.removed,
            failed = removal.failures.len(),
            "Removed labels from issue"
        );
        removal
    }

    #[instrument(skip(self, body), fields(repo = %self.repository.full_name(), number = self.number))]
    async fn add_comment(&self, body: &str) -> LabelBotResult<()> {
        let repo = &self.repository;
        repo.client
            .create_issue_comment(&repo.owner, &repo.name, self.number, body)
            .await?;
        Ok(())
    }
}

/// A pull request in a repository.
#[derive(Debug, Clone)]
pub struct PullRequestTarget {
    repository: Repository,
    number: u64,
}

impl PullRequestTarget {
    pub fn new(repository: Repository, number: u64) -> Self {
        Self { repository, number }
    }

    /// Number of commits on the pull request.
    pub async fn commit_count(&self) -> LabelBotResult<u64> {
        let repo = &self.repository;
        let count = repo
            .client
            .get_pull_request_commit_count(&repo.owner, &repo.name, self.number)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl LabelTarget for PullRequestTarget {
    fn number(&self) -> u64 {
        self.number
    }

    async fn current_labels(&self) -> LabelBotResult<Vec<String>> {
        let repo = &self.repository;
        let labels = repo
            .client
            .list_pull_request_labels(&repo.owner, &repo.name, self.number)
            .await?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    #[instrument(skip(self), fields(repo = %self.repository.full_name(), number = self.number))]
    async fn add_labels(&self, names: &[String]) -> LabelBotResult<()> {
        let repo = &self.repository;
        repo.client
            .add_pull_request_labels(&repo.owner, &repo.name, self.number, names)
            .await?;
        info!("Added labels to pull request");
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.repository.full_name(), number = self.number))]
    async fn remove_labels(&self, names: &[String]) -> LabelRemoval {
        let repo = &self.repository;
        let removal = repo
            .client
            .remove_pull_request_labels(&repo.owner, &repo.name, self.number, names)
            .await;
        info!(
            removed = ?removal.removed,
            failed = removal.failures.len(),
            "Removed labels from pull request"
        );
        removal
    }

    #[instrument(skip(self, body), fields(repo = %self.repository.full_name(), number = self.number))]
    async fn add_comment(&self, body: &str) -> LabelBotResult<()> {
        let repo = &self.repository;
        repo.client
            .create_pull_request_comment(&repo.owner, &repo.name, self.number, body)
            .await?;
        Ok(())
    }
}

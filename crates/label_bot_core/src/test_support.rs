//! In-memory [`LabelClient`] used by the unit tests of this crate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use github_client::{
    CollaboratorPermission, Error, Label, LabelClient, LabelCreatePayload, LabelRemoval,
};

use crate::target::{IssueTarget, PullRequestTarget, Repository};

pub const OWNER: &str = "my-org";
pub const REPO: &str = "my-repo";

/// A mutating call made against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateLabel { name: String, color: String },
    AddIssueLabels(u64, Vec<String>),
    RemoveIssueLabels(u64, Vec<String>),
    IssueComment(u64, String),
    AddPullRequestLabels(u64, Vec<String>),
    RemovePullRequestLabels(u64, Vec<String>),
    PullRequestComment(u64, String),
}

/// Mock client with a fixed repository state.
///
/// Read calls answer from the configured fields. Mutating calls are recorded and, unless
/// configured to fail, succeed without changing the state.
pub struct MockLabelClient {
    pub repository_labels: Vec<String>,
    pub target_labels: Vec<String>,
    pub permission: String,
    pub commit_count: u64,
    pub failing_label_creations: Vec<String>,
    pub failing_label_removals: Vec<String>,
    pub fail_repository_labels: bool,
    pub fail_target_labels: bool,
    pub fail_permission: bool,
    pub fail_commit_count: bool,
    pub fail_add: bool,
    pub fail_remove: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl Default for MockLabelClient {
    fn default() -> Self {
        Self {
            repository_labels: Vec::new(),
            target_labels: Vec::new(),
            permission: "write".to_string(),
            commit_count: 1,
            failing_label_creations: Vec::new(),
            failing_label_removals: Vec::new(),
            fail_repository_labels: false,
            fail_target_labels: false,
            fail_permission: false,
            fail_commit_count: false,
            fail_add: false,
            fail_remove: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockLabelClient {
    fn removal(&self, labels: &[String]) -> LabelRemoval {
        let mut removal = LabelRemoval::default();
        for label in labels {
            if self.fail_remove || self.failing_label_removals.contains(label) {
                removal
                    .failures
                    .push((label.clone(), Error::InvalidResponse));
            } else {
                removal.removed.push(label.clone());
            }
        }
        removal
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn labels(names: &[String]) -> Vec<Label> {
        names
            .iter()
            .map(|name| Label { name: name.clone() })
            .collect()
    }
}

pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn repository(client: &Arc<MockLabelClient>) -> Repository {
    Repository::new(client.clone(), OWNER, REPO)
}

pub fn issue(client: &Arc<MockLabelClient>, number: u64) -> IssueTarget {
    IssueTarget::new(repository(client), number)
}

pub fn pull_request(client: &Arc<MockLabelClient>, number: u64) -> PullRequestTarget {
    PullRequestTarget::new(repository(client), number)
}

#[async_trait]
impl LabelClient for MockLabelClient {
    async fn list_repository_labels(&self, _owner: &str, _repo: &str) -> Result<Vec<Label>, Error> {
        if self.fail_repository_labels {
            return Err(Error::InvalidResponse);
        }
        Ok(Self::labels(&self.repository_labels))
    }

    async fn create_repository_label(
        &self,
        _owner: &str,
        _repo: &str,
        payload: &LabelCreatePayload,
    ) -> Result<Label, Error> {
        self.record(Call::CreateLabel {
            name: payload.name.clone(),
            color: payload.color.clone(),
        });
        if self.failing_label_creations.contains(&payload.name) {
            return Err(Error::InvalidResponse);
        }
        Ok(Label {
            name: payload.name.clone(),
        })
    }

    async fn list_issue_labels(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<Vec<Label>, Error> {
        if self.fail_target_labels {
            return Err(Error::NotFound);
        }
        Ok(Self::labels(&self.target_labels))
    }

    async fn add_issue_labels(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        self.record(Call::AddIssueLabels(number, labels.to_vec()));
        if self.fail_add {
            return Err(Error::InvalidResponse);
        }
        Ok(())
    }

    async fn remove_issue_labels(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        labels: &[String],
    ) -> LabelRemoval {
        self.record(Call::RemoveIssueLabels(number, labels.to_vec()));
        self.removal(labels)
    }

    async fn create_issue_comment(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), Error> {
        self.record(Call::IssueComment(number, body.to_string()));
        Ok(())
    }

    async fn list_pull_request_labels(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<Vec<Label>, Error> {
        if self.fail_target_labels {
            return Err(Error::NotFound);
        }
        Ok(Self::labels(&self.target_labels))
    }

    async fn add_pull_request_labels(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        self.record(Call::AddPullRequestLabels(number, labels.to_vec()));
        if self.fail_add {
            return Err(Error::InvalidResponse);
        }
        Ok(())
    }

    async fn remove_pull_request_labels(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        labels: &[String],
    ) -> LabelRemoval {
        self.record(Call::RemovePullRequestLabels(number, labels.to_vec()));
        self.removal(labels)
    }

    async fn create_pull_request_comment(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), Error> {
        self.record(Call::PullRequestComment(number, body.to_string()));
        Ok(())
    }

    async fn get_collaborator_permission(
        &self,
        _owner: &str,
        _repo: &str,
        _username: &str,
    ) -> Result<CollaboratorPermission, Error> {
        if self.fail_permission {
            return Err(Error::RateLimitExceeded);
        }
        Ok(CollaboratorPermission {
            permission: self.permission.clone(),
            role_name: None,
        })
    }

    async fn get_pull_request_commit_count(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<u64, Error> {
        if self.fail_commit_count {
            return Err(Error::InvalidResponse);
        }
        Ok(self.commit_count)
    }
}

//! Repository events handled by the label bot.
//!
//! These types are independent of the webhook payload format; the API layer translates
//! deliveries into them.

use serde::{Deserialize, Serialize};

/// A repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Issue,
    PullRequest,
}

/// An issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub repository: RepositoryRef,
    pub kind: TargetKind,
    pub number: u64,
}

/// A new comment on an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEvent {
    pub target: TargetRef,

    /// Login of the comment author.
    pub author: String,

    pub body: String,
}

/// A request to add and remove labels, extracted from a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCommandEvent {
    pub target: TargetRef,

    /// Login of the user who asked for the change.
    pub author: String,

    pub add: Vec<String>,
    pub remove: Vec<String>,
}

/// What happened to a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestAction {
    Opened,

    /// New commits were pushed to, or force-pushed over, the source branch.
    SourceBranchChanged,

    Other(String),
}

impl PullRequestAction {
    /// Maps a GitHub `pull_request` webhook action.
    pub fn from_webhook_action(action: &str) -> Self {
        match action {
            "opened" => PullRequestAction::Opened,
            "synchronize" => PullRequestAction::SourceBranchChanged,
            other => PullRequestAction::Other(other.to_string()),
        }
    }
}

/// A pull request lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub repository: RepositoryRef,
    pub number: u64,
    pub action: PullRequestAction,

    /// Labels applied to the pull request when the event was sent.
    pub labels: Vec<String>,
}

//! GitHub webhook payloads.
//!
//! Only the fields the label bot uses are modeled; everything else in a delivery is
//! ignored. Each payload translates into the matching [`label_bot_core`] event.

use label_bot_core::{
    CommentEvent, PullRequestAction, PullRequestEvent, RepositoryRef, TargetKind, TargetRef,
};
use serde::Deserialize;

#[cfg(test)]
#[path = "payloads_tests.rs"]
mod tests;

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: UserPayload,
}

impl RepositoryPayload {
    fn to_ref(&self) -> RepositoryRef {
        RepositoryRef::new(self.owner.login.as_str(), self.name.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelPayload {
    pub name: String,
}

/// The issue a comment was made on.
///
/// Comments on pull requests arrive as issue comments; their issue carries a
/// `pull_request` object.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub number: u64,
    pub state: String,

    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    #[serde(default)]
    pub body: Option<String>,
    pub user: UserPayload,
}

/// Payload of an `issue_comment` delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentPayload {
    pub action: String,
    pub issue: IssuePayload,
    pub comment: CommentPayload,
    pub repository: RepositoryPayload,
}

impl IssueCommentPayload {
    /// Returns true for new comments on open issues and pull requests.
    pub fn is_actionable(&self) -> bool {
        self.action == "created" && self.issue.state == "open"
    }

    pub fn to_event(&self) -> CommentEvent {
        let kind = if self.issue.pull_request.is_some() {
            TargetKind::PullRequest
        } else {
            TargetKind::Issue
        };

        CommentEvent {
            target: TargetRef {
                repository: self.repository.to_ref(),
                kind,
                number: self.issue.number,
            },
            author: self.comment.user.login.clone(),
            body: self.comment.body.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestBody {
    pub number: u64,

    #[serde(default)]
    pub labels: Vec<LabelPayload>,
}

/// Payload of a `pull_request` delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub action: String,
    pub pull_request: PullRequestBody,
    pub repository: RepositoryPayload,
}

impl PullRequestPayload {
    pub fn to_event(&self) -> PullRequestEvent {
        PullRequestEvent {
            repository: self.repository.to_ref(),
            number: self.pull_request.number,
            action: PullRequestAction::from_webhook_action(&self.action),
            labels: self
                .pull_request
                .labels
                .iter()
                .map(|l| l.name.clone())
                .collect(),
        }
    }
}

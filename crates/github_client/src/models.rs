//! # Models
//!
//! Response models for the GitHub endpoints the label bot calls besides the label
//! endpoints themselves: collaborator permissions and pull request details.

use serde::{Deserialize, Serialize};

use crate::Label;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The permission a user holds on a repository.
///
/// Returned by `GET /repos/{owner}/{repo}/collaborators/{username}/permission`.
/// GitHub reports one of `admin`, `write`, `read` or `none` here; the finer
/// grained role (`maintain`, `triage`) is carried in `role_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorPermission {
    pub permission: String,

    #[serde(default)]
    pub role_name: Option<String>,
}

impl CollaboratorPermission {
    /// A permission for users that have no access to the repository.
    pub fn none() -> Self {
        Self {
            permission: "none".to_string(),
            role_name: None,
        }
    }

    /// Returns true if the user may push to the repository.
    ///
    /// # Examples
    ///
    /// ```
    /// use github_client::models::CollaboratorPermission;
    ///
    /// let permission = CollaboratorPermission {
    ///     permission: "write".to_string(),
    ///     role_name: Some("maintain".to_string()),
    /// };
    /// assert!(permission.has_write_access());
    /// ```
    pub fn has_write_access(&self) -> bool {
        matches!(self.permission.as_str(), "admin" | "write")
    }
}

/// The subset of a pull request the label bot reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestDetails {
    pub number: u64,

    /// Number of commits on the pull request. Absent on some list responses.
    #[serde(default)]
    pub commits: Option<u64>,

    #[serde(default)]
    pub labels: Vec<Label>,
}

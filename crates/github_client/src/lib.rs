//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides the label-related GitHub operations the label bot needs, behind the
//! [`LabelClient`] trait, together with helpers for authenticating either as a GitHub App
//! installation or with a personal access token.

use async_trait::async_trait;
use jsonwebtoken::EncodingKey;
use octocrab::{Octocrab, Result as OctocrabResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, instrument};

pub mod errors;
pub use errors::Error;

pub mod label;
pub use label::{Label, LabelCreatePayload, LabelRemoval};

pub mod models;
pub use models::{CollaboratorPermission, PullRequestDetails};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Number of items requested per page from list endpoints.
const PAGE_SIZE: usize = 100;

/// A client for interacting with the GitHub API.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

#[derive(Serialize)]
struct PageQuery {
    per_page: usize,
    page: u32,
}

#[derive(Serialize)]
struct LabelsPayload<'a> {
    labels: &'a [String],
}

#[derive(Serialize)]
struct CommentPayload<'a> {
    body: &'a str,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from an authenticated `Octocrab` instance.
    ///
    /// Use [`create_app_client`], [`create_installation_client`] or
    /// [`create_token_client`] to build the `Octocrab` instance.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Reads every page of a list endpoint.
    ///
    /// Stops at the first page holding fewer than [`PAGE_SIZE`] items.
    async fn list_all<T>(&self, path: &str, message: &str) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned + Send,
    {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let query = PageQuery {
                per_page: PAGE_SIZE,
                page,
            };
            let result: OctocrabResult<Vec<T>> = self.client.get(path, Some(&query)).await;
            let batch = result.map_err(|e| to_client_error(message, e))?;

            let is_last_page = batch.len() < PAGE_SIZE;
            items.extend(batch);
            if is_last_page {
                break;
            }

            page += 1;
        }

        debug!(path = path, count = items.len(), "Listed all pages");
        Ok(items)
    }

    /// Adds labels through the issues endpoint, which GitHub shares between
    /// issues and pull requests.
    async fn add_labels_to_issue_or_pull(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        let path = format!("/repos/{}/{}/issues/{}/labels", owner, repo, number);
        let response: OctocrabResult<Vec<Label>> = self
            .client
            .post(path, Some(&LabelsPayload { labels }))
            .await;

        match response {
            Ok(_) => {
                info!(
                    owner = owner,
                    repo = repo,
                    number = number,
                    labels = ?labels,
                    "Added labels"
                );
                Ok(())
            }
            Err(e) => Err(to_client_error("Failed to add labels", e)),
        }
    }

    /// Removes labels one by one. A label that is already gone is not an error.
    ///
    /// Every label is attempted even after a failure.
    async fn remove_labels_from_issue_or_pull(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> LabelRemoval {
        let mut removal = LabelRemoval::default();

        for label in labels {
            let path = format!(
                "/repos/{}/{}/issues/{}/labels/{}",
                owner,
                repo,
                number,
                urlencoding::encode(label)
            );
            let response: OctocrabResult<Vec<Label>> =
                self.client.delete(path, None::<&()>).await;

            match response {
                Ok(_) => {
                    info!(
                        owner = owner,
                        repo = repo,
                        number = number,
                        label = label.as_str(),
                        "Removed label"
                    );
                    removal.removed.push(label.clone());
                }
                Err(e) if is_not_found(&e) => {
                    debug!(
                        owner = owner,
                        repo = repo,
                        number = number,
                        label = label.as_str(),
                        "Label was not applied, nothing to remove"
                    );
                    removal.not_applied.push(label.clone());
                }
                Err(e) => {
                    let error = to_client_error("Failed to remove label", e);
                    removal.failures.push((label.clone(), error));
                }
            }
        }

        removal
    }

    async fn comment_on_issue_or_pull(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), Error> {
        let path = format!("/repos/{}/{}/issues/{}/comments", owner, repo, number);
        let response: OctocrabResult<serde_json::Value> =
            self.client.post(path, Some(&CommentPayload { body })).await;

        match response {
            Ok(_) => {
                info!(owner = owner, repo = repo, number = number, "Posted comment");
                Ok(())
            }
            Err(e) => Err(to_client_error("Failed to post comment", e)),
        }
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetails, Error> {
        let path = format!("/repos/{}/{}/pulls/{}", owner, repo, number);
        let response: OctocrabResult<PullRequestDetails> =
            self.client.get(path, None::<&()>).await;
        response.map_err(|e| to_client_error("Failed to get pull request", e))
    }
}

#[async_trait]
impl LabelClient for GitHubClient {
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_repository_labels(&self, owner: &str, repo: &str) -> Result<Vec<Label>, Error> {
        let path = format!("/repos/{}/{}/labels", owner, repo);
        self.list_all(&path, "Failed to list repository labels")
            .await
    }

    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo, label = %payload.name))]
    async fn create_repository_label(
        &self,
        owner: &str,
        repo: &str,
        payload: &LabelCreatePayload,
    ) -> Result<Label, Error> {
        let path = format!("/repos/{}/{}/labels", owner, repo);
        let response: OctocrabResult<Label> = self.client.post(path, Some(payload)).await;
        match response {
            Ok(label) => {
                info!(label = label.name.as_str(), "Created repository label");
                Ok(label)
            }
            Err(e) => Err(to_client_error("Failed to create repository label", e)),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn list_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Label>, Error> {
        let path = format!("/repos/{}/{}/issues/{}/labels", owner, repo, number);
        self.list_all(&path, "Failed to list issue labels").await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn add_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        self.add_labels_to_issue_or_pull(owner, repo, number, labels)
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn remove_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> LabelRemoval {
        self.remove_labels_from_issue_or_pull(owner, repo, number, labels)
            .await
    }

    #[instrument(skip(self, body), fields(owner = %owner, repo = %repo, number = number))]
    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), Error> {
        self.comment_on_issue_or_pull(owner, repo, number, body)
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn list_pull_request_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Label>, Error> {
        let pull_request = self.get_pull_request(owner, repo, number).await?;
        Ok(pull_request.labels)
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn add_pull_request_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        self.add_labels_to_issue_or_pull(owner, repo, number, labels)
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn remove_pull_request_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> LabelRemoval {
        self.remove_labels_from_issue_or_pull(owner, repo, number, labels)
            .await
    }

    #[instrument(skip(self, body), fields(owner = %owner, repo = %repo, number = number))]
    async fn create_pull_request_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), Error> {
        self.comment_on_issue_or_pull(owner, repo, number, body)
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, username = %username))]
    async fn get_collaborator_permission(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> Result<CollaboratorPermission, Error> {
        let path = format!(
            "/repos/{}/{}/collaborators/{}/permission",
            owner,
            repo,
            urlencoding::encode(username)
        );
        let response: OctocrabResult<CollaboratorPermission> =
            self.client.get(path, None::<&()>).await;

        match response {
            Ok(permission) => Ok(permission),
            Err(e) if is_not_found(&e) => {
                debug!("User is not a collaborator on the repository");
                Ok(CollaboratorPermission::none())
            }
            Err(e) => Err(to_client_error("Failed to get collaborator permission", e)),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn get_pull_request_commit_count(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<u64, Error> {
        let pull_request = self.get_pull_request(owner, repo, number).await?;
        pull_request.commits.ok_or_else(|| {
            error!("Pull request response did not contain a commit count");
            Error::InvalidResponse
        })
    }
}

/// Trait for the label operations the label bot performs against a hosting platform.
///
/// Issues and pull requests have separate methods even where GitHub serves both from the
/// same endpoint, so that callers never need to know how a platform shares endpoints.
#[async_trait]
pub trait LabelClient: Send + Sync {
    /// Lists every label declared on the repository.
    async fn list_repository_labels(&self, owner: &str, repo: &str) -> Result<Vec<Label>, Error>;

    /// Declares a new label on the repository.
    ///
    /// # Errors
    /// Returns an error if the label already exists or the app lacks permission.
    async fn create_repository_label(
        &self,
        owner: &str,
        repo: &str,
        payload: &LabelCreatePayload,
    ) -> Result<Label, Error>;

    async fn list_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Label>, Error>;

    async fn add_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error>;

    /// Removes all of the given labels from the issue.
    ///
    /// Every label is attempted even if removing another one fails. Labels that are not
    /// applied are reported in [`LabelRemoval::not_applied`] rather than as failures.
    async fn remove_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> LabelRemoval;

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), Error>;

    async fn list_pull_request_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Label>, Error>;

    async fn add_pull_request_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error>;

    /// Removes all of the given labels from the pull request.
    ///
    /// Every label is attempted even if removing another one fails. Labels that are not
    /// applied are reported in [`LabelRemoval::not_applied`] rather than as failures.
    async fn remove_pull_request_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> LabelRemoval;

    async fn create_pull_request_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), Error>;

    /// Gets the permission a user holds on the repository.
    ///
    /// Users without any access get [`CollaboratorPermission::none`] rather than an error.
    async fn get_collaborator_permission(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> Result<CollaboratorPermission, Error>;

    /// Gets the number of commits on a pull request.
    async fn get_pull_request_commit_count(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<u64, Error>;
}

/// Creates an `Octocrab` client that acts as a specific GitHub App installation.
///
/// The returned client requests an installation access token on first use and requests a
/// new one whenever the cached token has expired, so it can be kept for the lifetime of
/// the process.
///
/// # Arguments
///
/// * `app_client` - An `Octocrab` client authenticated as the GitHub App.
/// * `installation_id` - The ID of the GitHub App installation.
///
/// # Errors
///
/// Returns `Error::AuthError` if `app_client` is not authenticated as a GitHub App.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_app_client, create_installation_client, Error};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Error> {
///     let private_key = std::fs::read_to_string("app.pem").unwrap();
///     let app_client = create_app_client(123456, &private_key).await?;
///
///     let installation_client = create_installation_client(&app_client, 12345678)?;
///
///     // Use `installation_client` to perform API operations
///     Ok(())
/// }
/// ```
#[instrument(skip(app_client))]
pub fn create_installation_client(
    app_client: &Octocrab,
    installation_id: u64,
) -> Result<Octocrab, Error> {
    let client = app_client
        .installation(installation_id.into())
        .map_err(|e| {
            error!(
                installation_id,
                error = ?e,
                "Failed to create a client for the installation"
            );
            Error::AuthError(format!(
                "Failed to act as installation {}. Error was: {}",
                installation_id, e
            ))
        })?;

    info!(installation_id, "Created client for installation");

    Ok(client)
}

/// Creates an `Octocrab` client authenticated as a GitHub App using a JWT token.
///
/// # Arguments
///
/// * `app_id` - The ID of the GitHub App.
/// * `private_key` - The private key associated with the GitHub App, in PEM format.
///
/// # Errors
///
/// Returns `Error::AuthError` if the private key cannot be parsed or the client
/// cannot be built.
#[instrument(skip(private_key))]
pub async fn create_app_client(app_id: u64, private_key: &str) -> Result<Octocrab, Error> {
    info!(
        app_id = app_id,
        key_length = private_key.len(),
        "Creating GitHub App client with provided credentials"
    );

    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
        error!(
            app_id = app_id,
            error = %e,
            "Failed to parse RSA private key - key format is invalid"
        );
        Error::AuthError(format!(
            "Failed to translate the private key. Error was: {}",
            e
        ))
    })?;

    let octocrab = Octocrab::builder()
        .app(app_id.into(), key)
        .build()
        .map_err(|e| {
            error!(
                app_id = app_id,
                error = ?e,
                "Failed to build Octocrab client with GitHub App credentials"
            );
            Error::AuthError("Failed to build the GitHub App client.".to_string())
        })?;

    info!(app_id = app_id, "Successfully created GitHub App client");

    Ok(octocrab)
}

/// Creates an `Octocrab` client authenticated with a personal access token.
#[instrument(skip(token))]
pub fn create_token_client(token: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| {
            error!(error = ?e, "Failed to build Octocrab client with a personal access token");
            Error::AuthError(format!("Failed to build the token client. Error was: {}", e))
        })
}

fn is_not_found(e: &octocrab::Error) -> bool {
    matches!(classify_octocrab_error(e), Error::NotFound)
}

/// Maps an octocrab error onto the client's error type using the HTTP status GitHub sent.
fn classify_octocrab_error(e: &octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, .. } => match source.status_code.as_u16() {
            401 => Error::AuthError(source.message.clone()),
            404 => Error::NotFound,
            429 => Error::RateLimitExceeded,
            403 if source.message.to_lowercase().contains("rate limit") => {
                Error::RateLimitExceeded
            }
            _ => Error::InvalidResponse,
        },
        _ => Error::InvalidResponse,
    }
}

fn to_client_error(message: &str, e: octocrab::Error) -> Error {
    let error = classify_octocrab_error(&e);
    log_octocrab_error(message, e);
    error
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = source;
            error!(
                error_message = err.message,
                status_code = err.status_code.as_u16(),
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),

        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidHeaderValue { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. One of the header values was invalid.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}

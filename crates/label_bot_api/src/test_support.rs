//! Test helpers for the HTTP layer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use config_manager::BotConfig;
use github_client::{
    CollaboratorPermission, Error, Label, LabelClient, LabelCreatePayload, LabelRemoval,
};
use label_bot_core::LabelBot;

use crate::AppState;

pub const SECRET: &str = "webhook-secret";

/// Client for a repository declaring `kind/bug` with nothing applied.
///
/// Records the labels added to issues and pull requests as `"<number>:<label>"`.
#[derive(Default)]
pub struct RecordingClient {
    pub added: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingClient {
    pub fn added(&self) -> Vec<String> {
        self.added.lock().unwrap().clone()
    }

    fn add(&self, number: u64, labels: &[String]) -> Result<(), Error> {
        if self.fail {
            return Err(Error::InvalidResponse);
        }
        let mut added = self.added.lock().unwrap();
        added.extend(labels.iter().map(|l| format!("{}:{}", number, l)));
        Ok(())
    }
}

#[async_trait]
impl LabelClient for RecordingClient {
    async fn list_repository_labels(&self, _owner: &str, _repo: &str) -> Result<Vec<Label>, Error> {
        Ok(vec![Label {
            name: "kind/bug".to_string(),
        }])
    }

    async fn create_repository_label(
        &self,
        _owner: &str,
        _repo: &str,
        payload: &LabelCreatePayload,
    ) -> Result<Label, Error> {
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
        Ok(Vec::new())
    }

    async fn add_issue_labels(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        self.add(number, labels)
    }

    async fn remove_issue_labels(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
        labels: &[String],
    ) -> LabelRemoval {
        LabelRemoval {
            removed: labels.to_vec(),
            ..Default::default()
        }
    }

    async fn create_issue_comment(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
        _body: &str,
    ) -> Result<(), Error> {
        Ok(())
    }

    async fn list_pull_request_labels(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<Vec<Label>, Error> {
        Ok(Vec::new())
    }

    async fn add_pull_request_labels(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        self.add(number, labels)
    }

    async fn remove_pull_request_labels(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
        labels: &[String],
    ) -> LabelRemoval {
        LabelRemoval {
            removed: labels.to_vec(),
            ..Default::default()
        }
    }

    async fn create_pull_request_comment(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
        _body: &str,
    ) -> Result<(), Error> {
        Ok(())
    }

    async fn get_collaborator_permission(
        &self,
        _owner: &str,
        _repo: &str,
        _username: &str,
    ) -> Result<CollaboratorPermission, Error> {
        Ok(CollaboratorPermission::none())
    }

    async fn get_pull_request_commit_count(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<u64, Error> {
        Ok(10)
    }
}

pub fn bot_config() -> BotConfig {
    BotConfig::from_toml_str(
        r#"
        [[repositories]]
        repos = ["my-org"]

        [repositories.squash]
        commits_threshold = 5
        squash_commit_label = "stat/needs-squash"
        "#,
    )
    .unwrap()
}

pub fn app_state(client: Arc<RecordingClient>, secret: Option<&str>) -> AppState {
    AppState::new(
        LabelBot::new(client, bot_config()),
        secret.map(str::to_string),
    )
}

use super::*;
use crate::test_support::{self, MockLabelClient};
use std::sync::Arc;

#[tokio::test]
async fn test_disabled_gate_never_asks_the_platform() {
    let client = Arc::new(MockLabelClient {
        fail_permission: true,
        ..Default::default()
    });
    let repository = test_support::repository(&client);
    let gate = CollaboratorGate::new(false);

    let allowed = gate.may_create_labels("octocat", &repository).await;

    assert!(!allowed.unwrap(), "Disabled gate must deny without a lookup");
}

#[tokio::test]
async fn test_enabled_gate_allows_collaborators() {
    let client = Arc::new(MockLabelClient::default());
    let repository = test_support::repository(&client);
    let gate = CollaboratorGate::new(true);

    assert!(gate.may_create_labels("octocat", &repository).await.unwrap());
}

#[tokio::test]
async fn test_enabled_gate_denies_readers() {
    let client = Arc::new(MockLabelClient {
        permission: "read".to_string(),
        ..Default::default()
    });
    let repository = test_support::repository(&client);
    let gate = CollaboratorGate::new(true);

    assert!(!gate.may_create_labels("octocat", &repository).await.unwrap());
}

#[tokio::test]
async fn test_enabled_gate_surfaces_lookup_failures() {
    let client = Arc::new(MockLabelClient {
        fail_permission: true,
        ..Default::default()
    });
    let repository = test_support::repository(&client);
    let gate = CollaboratorGate::new(true);

    let result = gate.may_create_labels("octocat", &repository).await;

    assert!(result.is_err());
}

#[test]
fn test_gate_from_config() {
    let mut config = RepositoryConfig::for_repos(["my-org"]);
    assert_eq!(CollaboratorGate::from_config(&config), CollaboratorGate::new(false));

    config.allow_creating_labels_by_collaborator = true;
    assert_eq!(CollaboratorGate::from_config(&config), CollaboratorGate::new(true));
}

//! Tests for clear-label configuration.

use super::*;

#[test]
fn test_clear_label_config_without_pattern() {
    let config = ClearLabelConfig::new(vec!["lgtm".to_string()], None).unwrap();

    assert_eq!(config.labels, vec!["lgtm".to_string()]);
    assert!(config.pattern.is_none());
    assert!(!config.is_empty());
}

#[test]
fn test_clear_label_config_blank_pattern_is_ignored() {
    let config = ClearLabelConfig::new(Vec::new(), Some("   ")).unwrap();

    assert!(config.pattern.is_none());
    assert!(config.is_empty());
}

#[test]
fn test_clear_label_config_compiles_pattern() {
    let config = ClearLabelConfig::new(Vec::new(), Some("^ci/.*")).unwrap();

    let pattern = config.pattern.expect("Pattern should be compiled");
    assert!(pattern.is_match("ci/failed"));
    assert!(!pattern.is_match("kind/bug"));
}

#[test]
fn test_clear_label_config_rejects_invalid_pattern() {
    let result = ClearLabelConfig::new(Vec::new(), Some("^ci/("));

    match result {
        Err(ConfigurationError::InvalidConfiguration { field, .. }) => {
            assert_eq!(field, "clear_labels_by_regexp");
        }
        other => panic!("Expected InvalidConfiguration, got {:?}", other),
    }
}

#[test]
fn test_clear_label_configs_compare_by_pattern_text() {
    let first = ClearLabelConfig::new(vec!["lgtm".to_string()], Some("^ci/.*")).unwrap();
    let same = ClearLabelConfig::new(vec!["lgtm".to_string()], Some("^ci/.*")).unwrap();
    let other = ClearLabelConfig::new(vec!["lgtm".to_string()], Some("^ci/")).unwrap();

    assert_eq!(first, same);
    assert_ne!(first, other);
}

//! Configuration tests
//!
//! Config paths, YAML loading and how the controller applies the settings.

mod common;

use follow_mode::config::{MissingResolver, ToggleScope};
use follow_mode::config_paths;
use follow_mode::follow::{FollowError, ResolverCatalog, ResolverRegistry};
use follow_mode::host::ViewKind;
use follow_mode::FollowConfig;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("follow-mode"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(file) = config_paths::config_file() {
        assert!(file.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_under_config_dir() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(config));
    }
}

// ========================================================================
// FollowConfig Tests
// ========================================================================

#[test]
fn test_defaults() {
    let config = FollowConfig::default();
    assert!(config.enabled);
    assert_eq!(config.toggle_key, "f");
    assert_eq!(config.toggle_scope, ToggleScope::Global);
    assert_eq!(config.missing_resolver, MissingResolver::Notice);
    assert!(config.resolvers.is_empty());
    assert!(config.heights.is_empty());
}

#[test]
fn test_empty_yaml_gives_defaults() {
    let config = FollowConfig::from_yaml("{}").unwrap();
    assert!(config.enabled);
    assert_eq!(config.toggle_key, "f");
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
enabled: false
toggle_key: "ctrl+shift+f"
toggle_scope: session
missing_resolver: fatal
resolvers:
  occurrences: grep-line
heights:
  occurrences: 10
"#;
    let config = FollowConfig::from_yaml(yaml).unwrap();

    assert!(!config.enabled);
    assert_eq!(config.toggle_key, "ctrl+shift+f");
    assert_eq!(config.toggle_scope, ToggleScope::Session);
    assert_eq!(config.missing_resolver, MissingResolver::Fatal);
    assert_eq!(
        config.resolvers.get(&ViewKind::from("occurrences")),
        Some(&"grep-line".to_string())
    );
    assert_eq!(config.height_for(&ViewKind::from("occurrences")), Some(10));
    assert_eq!(config.height_for(&ViewKind::from("diagnostics")), None);
}

#[test]
fn test_unknown_enum_value_is_an_error() {
    let err = FollowConfig::from_yaml("toggle_scope: everywhere").unwrap_err();
    assert!(matches!(err, FollowError::Config(_)));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "missing_resolver: fatal\n").unwrap();

    let config = FollowConfig::load_from(&path).unwrap();

    assert_eq!(config.missing_resolver, MissingResolver::Fatal);
    assert!(config.enabled);
}

#[test]
fn test_load_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = FollowConfig::load_from(&dir.path().join("nope.yaml")).unwrap_err();
    match err {
        FollowError::Config(msg) => assert!(msg.contains("nope.yaml")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_load_from_invalid_yaml_names_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "enabled: [not a bool\n").unwrap();

    let err = FollowConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("broken.yaml"));
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let mut config = FollowConfig {
        toggle_scope: ToggleScope::Session,
        ..FollowConfig::default()
    };
    config
        .resolvers
        .insert(ViewKind::from("occurrences"), "grep-line".to_string());
    config.heights.insert(ViewKind::from("occurrences"), 8);

    config.save_to(&path).unwrap();
    let loaded = FollowConfig::load_from(&path).unwrap();

    assert_eq!(loaded.toggle_scope, ToggleScope::Session);
    assert_eq!(loaded.resolvers, config.resolvers);
    assert_eq!(loaded.heights, config.heights);
}

// ========================================================================
// Applying the config
// ========================================================================

#[test]
fn test_named_resolvers_bound_from_config() {
    let config = FollowConfig::from_yaml(
        "resolvers:\n  occurrences: grep-line\n  diagnostics: compile-error\n",
    )
    .unwrap();
    let mut catalog = ResolverCatalog::new();
    catalog.insert("grep-line".to_string(), common::failing());

    let mut registry = ResolverRegistry::new();
    let unknown = registry.bind_named(&config.resolvers, &catalog);

    assert_eq!(unknown, vec!["compile-error".to_string()]);
    assert_eq!(registry.kinds(), vec![ViewKind::from("occurrences")]);
}

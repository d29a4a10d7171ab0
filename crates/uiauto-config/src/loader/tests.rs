//! Tests for base/override config loading.

use super::*;
use crate::BrowserKind;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BASE: &str = r#"
env: "dev"
app: { base_url: "http://example.com", login_path: "" }
browser: { type: "chromium", headless: false, slow_mo: 0 }
timeout: { short: 3000, medium: 5000, long: 10000 }
account: { username: "x", password: "x" }
report: { screenshot_dir: "reports/screenshots" }
"#;

/// Write YAML contents to a path, creating parent directories if needed.
fn write_yaml(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Temp config dir holding the standard base document.
fn config_dir() -> TempDir {
    let temp = TempDir::new().expect("tmp");
    write_yaml(&temp.path().join(BASE_CONFIG_FILE), BASE);
    temp
}

/// Override keys win while untouched base keys are inherited.
#[test]
fn override_replaces_only_the_keys_it_names() {
    let temp = config_dir();
    write_yaml(
        &temp.path().join("config_dev.yaml"),
        "app: { base_url: \"http://other-host\" }",
    );

    let config = load(&ResolverOptions::without_env(temp.path())).expect("config");
    assert_eq!(config.app.base_url, "http://other-host");
    assert_eq!(config.app.login_path, "");
    assert_eq!(config.browser.kind, BrowserKind::Chromium);
    assert!(!config.browser.headless);
    assert_eq!(config.account.username, "x");
    assert_eq!(config.sources.len(), 2);
    assert_eq!(config.sources[1].source, DocumentSource::Override);
}

/// A missing override file leaves the base document as the result.
#[test]
fn missing_override_file_uses_base_unchanged() {
    let temp = config_dir();
    let config = load(&ResolverOptions::without_env(temp.path())).expect("config");
    let base: Value = serde_yaml::from_str(BASE).expect("yaml");
    assert_eq!(config.document, base);
    assert_eq!(config.env, "dev");
    assert_eq!(config.sources.len(), 1);
}

/// An explicit environment beats the `env` field of the base document.
#[test]
fn external_override_beats_base_env_field() {
    let temp = config_dir();
    write_yaml(
        &temp.path().join("config_dev.yaml"),
        "app: { base_url: \"http://dev-host\" }",
    );
    write_yaml(
        &temp.path().join("config_test.yaml"),
        "app: { base_url: \"http://test-host\" }",
    );

    let options = ResolverOptions::without_env(temp.path()).with_env_override("test");
    let config = load(&options).expect("config");
    assert_eq!(config.app.base_url, "http://test-host");
    assert_eq!(config.env, "test");
    assert_eq!(config.get_str("env"), Some("test"));
    assert_eq!(
        config.sources[1].path,
        temp.path().join("config_test.yaml")
    );
}

/// The `default` environment never reads an override document.
#[test]
fn default_environment_loads_no_override() {
    let temp = TempDir::new().expect("tmp");
    write_yaml(
        &temp.path().join(BASE_CONFIG_FILE),
        "env: default\napp: { base_url: \"http://base\" }",
    );
    write_yaml(
        &temp.path().join("config_default.yaml"),
        "app: { base_url: \"http://never\" }",
    );

    let config = load(&ResolverOptions::without_env(temp.path())).expect("config");
    assert_eq!(config.app.base_url, "http://base");
    assert_eq!(config.sources.len(), 1);
}

/// A base document without `env` resolves to the default environment.
#[test]
fn base_without_env_resolves_to_default() {
    let temp = TempDir::new().expect("tmp");
    write_yaml(&temp.path().join(BASE_CONFIG_FILE), "app: { base_url: \"http://base\" }");

    let config = load(&ResolverOptions::without_env(temp.path())).expect("config");
    assert_eq!(config.env, DEFAULT_ENV);
    assert!(config.get("env").is_none());
}

/// A missing base document is reported with its path.
#[test]
fn missing_base_is_fatal() {
    let temp = TempDir::new().expect("tmp");
    let err = load(&ResolverOptions::without_env(temp.path())).unwrap_err();
    match err {
        ConfigError::Missing { path } => assert_eq!(path, temp.path().join(BASE_CONFIG_FILE)),
        other => panic!("expected missing error, got {other}"),
    }
}

/// Parse errors in the override name the override document.
#[test]
fn malformed_override_names_the_document() {
    let temp = config_dir();
    write_yaml(&temp.path().join("config_dev.yaml"), "app: { base_url: [unclosed");

    let err = load(&ResolverOptions::without_env(temp.path())).unwrap_err();
    match &err {
        ConfigError::Parse { document, path, .. } => {
            assert_eq!(*document, "override");
            assert_eq!(path, &temp.path().join("config_dev.yaml"));
        }
        other => panic!("expected parse error, got {other}"),
    }
    assert!(err.is_document_error());
}

/// Parse errors in the base name the base document.
#[test]
fn malformed_base_names_the_document() {
    let temp = TempDir::new().expect("tmp");
    write_yaml(&temp.path().join(BASE_CONFIG_FILE), "env: [dev");

    let err = load(&ResolverOptions::without_env(temp.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { document: "base", .. }), "{err}");
}

/// An override that is not a mapping fails at the root.
#[test]
fn non_mapping_override_is_a_schema_error() {
    let temp = config_dir();
    write_yaml(&temp.path().join("config_dev.yaml"), "- a\n- b\n");

    let err = load(&ResolverOptions::without_env(temp.path())).unwrap_err();
    match err {
        ConfigError::Schema { document, path, .. } => {
            assert_eq!(document, "override");
            assert_eq!(path, "root");
        }
        other => panic!("expected schema error, got {other}"),
    }
}

/// A comment-only override changes nothing.
#[test]
fn blank_override_file_is_an_empty_diff() {
    let temp = config_dir();
    write_yaml(&temp.path().join("config_dev.yaml"), "# nothing to change\n");

    let config = load(&ResolverOptions::without_env(temp.path())).expect("config");
    assert_eq!(config.app.base_url, "http://example.com");
    assert_eq!(config.sources.len(), 2);
}

/// Override names follow a custom base file name.
#[test]
fn custom_base_file_derives_override_name() {
    let temp = TempDir::new().expect("tmp");
    write_yaml(&temp.path().join("settings.yml"), "env: qa\napp: { base_url: \"a\" }");
    write_yaml(&temp.path().join("settings_qa.yml"), "app: { base_url: \"b\" }");

    let options = ResolverOptions::without_env(temp.path()).with_base_file("settings.yml");
    let config = load(&options).expect("config");
    assert_eq!(config.app.base_url, "b");
}

/// Override file names keep the base extension.
#[test]
fn override_file_names() {
    assert_eq!(override_file_name("config.yaml", "test"), "config_test.yaml");
    assert_eq!(override_file_name("config", "test"), "config_test");
}

/// Blank external environments fall back to the base `env`.
#[test]
fn blank_external_override_counts_as_unset() {
    assert_eq!(env_override_from(Some("  ".to_string())), None);
    assert_eq!(env_override_from(Some(" test ".to_string())), Some("test".to_string()));
    assert_eq!(env_override_from(None), None);

    let base: Value = serde_yaml::from_str("env: dev").expect("yaml");
    assert_eq!(select_env(Some(""), &base), Some("dev".to_string()));
    assert_eq!(select_env(Some("test"), &base), Some("test".to_string()));
    assert_eq!(select_env(None, &Value::Null), None);
}

/// YAML merge keys are expanded before the documents are merged.
#[test]
fn merge_keys_are_expanded() {
    let temp = TempDir::new().expect("tmp");
    write_yaml(
        &temp.path().join(BASE_CONFIG_FILE),
        r#"
shared: &shared { base_url: "http://anchored", login_path: "/login" }
app: { <<: *shared }
"#,
    );
    write_yaml(
        &temp.path().join("config_qa.yaml"),
        r#"
defaults: &defaults { headless: true, slow_mo: 50 }
browser: { <<: *defaults, type: "firefox" }
"#,
    );

    let options = ResolverOptions::without_env(temp.path()).with_env_override("qa");
    let config = load(&options).expect("config");
    assert_eq!(config.app.base_url, "http://anchored");
    assert_eq!(config.app.login_path, "/login");
    assert!(config.get("app.<<").is_none());
    assert_eq!(config.browser.kind, BrowserKind::Firefox);
    assert!(config.browser.headless);
    assert_eq!(config.browser.slow_mo, 50);
}

/// A merge key pointing at a scalar is a parse error for that document.
#[test]
fn invalid_merge_key_is_a_parse_error() {
    let temp = config_dir();
    write_yaml(&temp.path().join("config_dev.yaml"), "app: { <<: 5 }");

    let err = load(&ResolverOptions::without_env(temp.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { document: "override", .. }), "{err}");
}

/// Environments containing path separators are rejected before any override is read.
#[test]
fn environment_with_path_separator_is_rejected() {
    let temp = config_dir();
    write_yaml(
        &temp.path().join("config_..").join("escape.yaml"),
        "app: { base_url: \"http://outside\" }",
    );

    for env in ["../escape", "nested/env", "a\\b"] {
        let options = ResolverOptions::without_env(temp.path()).with_env_override(env);
        match load(&options).unwrap_err() {
            ConfigError::InvalidEnv { env: rejected } => assert_eq!(rejected, env),
            other => panic!("expected invalid env error, got {other}"),
        }
    }
}

/// Browser types are matched case-insensitively by validation and decoding alike.
#[test]
fn browser_type_is_case_insensitive() {
    let temp = config_dir();
    write_yaml(
        &temp.path().join("config_dev.yaml"),
        "browser: { type: \"WebKit\" }",
    );

    let config = load(&ResolverOptions::without_env(temp.path())).expect("config");
    assert_eq!(config.browser.kind, BrowserKind::Webkit);
}

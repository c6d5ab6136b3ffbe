//! Configuration loading tests

use semantic_acl::access_control::AccessEvaluator;
use semantic_acl::config::{LogFormat, load_config, load_config_from_str};

const FULL_CONFIG: &str = r#"
[acl]
exempt_right = "acl-bypass"

[acl.namespaces]
Main = true
Template = true
File = false

[acl.group_rights]
bureaucrat = ["acl-bypass", "rename"]
sysop = ["block"]

[store]
path = "/var/lib/semantic-acl/attributes.toml"

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_empty_config_uses_defaults() {
    let config = load_config_from_str("").unwrap();

    let evaluator = AccessEvaluator::new(&config.acl);
    assert!(evaluator.is_acl_enabled("Main"));
    assert!(!evaluator.is_acl_enabled("Template"));

    assert!(config.acl.is_exempt(&["sysop"]));
    assert!(config.store.path.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    let evaluator = AccessEvaluator::new(&config.acl);
    assert!(evaluator.is_acl_enabled("main"));
    assert!(evaluator.is_acl_enabled("template"));
    assert!(!evaluator.is_acl_enabled("file"));

    // Exemption follows the configured right, not the default one
    assert!(config.acl.is_exempt(&["Bureaucrat"]));
    assert!(!config.acl.is_exempt(&["sysop"]));
    assert!(config.acl.groups_grant(&["sysop"], "block"));

    assert_eq!(
        config.store.path.as_deref(),
        Some("/var/lib/semantic-acl/attributes.toml")
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_invalid_log_format() {
    let config_str = r#"
[logging]
format = "xml"
"#;

    assert!(load_config_from_str(config_str).is_err());
}

#[test]
#[serial_test::serial]
fn test_load_config_from_file() {
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("semantic-acl.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();
    assert_eq!(config.acl.exempt_right, "acl-bypass");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
#[serial_test::serial]
fn test_env_var_overrides_file() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("semantic-acl.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    unsafe {
        env::set_var("SEMANTIC_ACL__STORE__PATH", "/tmp/override.toml");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();
    assert_eq!(config.store.path.as_deref(), Some("/tmp/override.toml"));

    unsafe {
        env::remove_var("SEMANTIC_ACL__STORE__PATH");
    }
}

//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (SEMANTIC_ACL__*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "semantic-acl.toml",
    ".semantic-acl.toml",
    "~/.config/semantic-acl/config.toml",
    "/etc/semantic-acl/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g., SEMANTIC_ACL__STORE__PATH, SEMANTIC_ACL__LOGGING__FORMAT
    // Double underscore (__) maps to nested keys (store.path)
    builder = builder.add_source(
        Environment::with_prefix("SEMANTIC_ACL")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.acl.exempt_right.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "acl.exempt_right".to_string(),
        });
    }

    if let Some(name) = config.acl.namespaces.keys().find(|ns| ns.trim().is_empty()) {
        return Err(ConfigError::Invalid {
            message: format!("acl.namespaces contains an empty namespace name: {:?}", name),
        });
    }

    if let Some(path) = &config.store.path
        && path.trim().is_empty()
    {
        return Err(ConfigError::Invalid {
            message: "store.path must not be empty when set".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[acl.namespaces]
main = true
template = true

[store]
path = "acl.toml"

[logging]
format = "json"
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.acl.enabled_namespaces().count(), 2);
        assert_eq!(config.store.path.as_deref(), Some("acl.toml"));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_empty_exempt_right_error() {
        let toml = r#"
[acl]
exempt_right = ""
"#;

        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_empty_store_path_error() {
        let toml = r#"
[store]
path = "  "
"#;

        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_missing_explicit_file_error() {
        let result = load_config(Some("/nonexistent/semantic-acl.toml"));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}

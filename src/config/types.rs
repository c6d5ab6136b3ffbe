//! Configuration types for semantic-acl
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use serde::Deserialize;
use std::collections::HashMap;

/// Right that bypasses every ACL check
pub const EXEMPT_RIGHT: &str = "sacl-exempt";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// ACL evaluation settings
    pub acl: AclConfig,

    /// Attribute store settings
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// ACL evaluation configuration
///
/// ```toml
/// [acl]
/// exempt_right = "sacl-exempt"
///
/// [acl.namespaces]
/// Main = true
/// Template = true
/// File = false
///
/// [acl.group_rights]
/// sysop = ["sacl-exempt"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Namespaces and whether ACL attributes are consulted in them.
    /// Namespaces not listed are not ACL-enabled.
    pub namespaces: HashMap<String, bool>,

    /// Rights granted to each group
    pub group_rights: HashMap<String, Vec<String>>,

    /// Name of the right that exempts an actor from ACLs
    pub exempt_right: String,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            namespaces: HashMap::from([("Main".to_string(), true)]),
            group_rights: HashMap::from([(
                "sysop".to_string(),
                vec![EXEMPT_RIGHT.to_string()],
            )]),
            exempt_right: EXEMPT_RIGHT.to_string(),
        }
    }
}

impl AclConfig {
    /// Names of the namespaces flagged as ACL-enabled
    pub fn enabled_namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
    }

    /// Names of every configured namespace, enabled or not.
    ///
    /// These are the prefixes recognized when resolving a title.
    pub fn known_namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Whether any of the groups grants `right` (group names ignore case)
    pub fn groups_grant<S: AsRef<str>>(&self, groups: &[S], right: &str) -> bool {
        self.group_rights.iter().any(|(group, rights)| {
            rights.iter().any(|r| r == right)
                && groups
                    .iter()
                    .any(|g| g.as_ref().trim().eq_ignore_ascii_case(group))
        })
    }

    /// Whether membership in `groups` exempts an actor from ACLs
    pub fn is_exempt<S: AsRef<str>>(&self, groups: &[S]) -> bool {
        self.groups_grant(groups, &self.exempt_right)
    }
}

/// Attribute store configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to a TOML attribute file; `~` is expanded
    pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.acl.exempt_right, EXEMPT_RIGHT);
        assert_eq!(config.acl.enabled_namespaces().collect::<Vec<_>>(), vec!["Main"]);
        assert!(config.store.path.is_none());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_sysop_is_exempt_by_default() {
        let acl = AclConfig::default();
        assert!(acl.is_exempt(&["Sysop"]));
        assert!(!acl.is_exempt(&["editors"]));
        assert!(!acl.is_exempt::<&str>(&[]));
    }

    #[test]
    fn test_disabled_namespaces_are_skipped() {
        let acl = AclConfig {
            namespaces: HashMap::from([
                ("Main".to_string(), true),
                ("File".to_string(), false),
            ]),
            ..Default::default()
        };
        assert_eq!(acl.enabled_namespaces().collect::<Vec<_>>(), vec!["Main"]);
        assert_eq!(acl.known_namespaces().count(), 2);
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}

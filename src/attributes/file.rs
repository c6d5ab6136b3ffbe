//! TOML file attribute store
//!
//! Layout:
//!
//! ```toml
//! [resources."Template:Secret"]
//! "Visible to" = ["users", "whitelist"]
//! "Visible to group" = "editors"
//! ___VISIBLE_WL_USER = ["Alice", "Bob"]
//! ```
//!
//! Keys are property keys or their aliases; values are a string or an
//! array of strings. Keys that are not ACL properties are ignored.

use crate::access_control::{ActionKind, PolicyAttribute, Resource};
use crate::attributes::reader::AttributeReader;
use crate::error::{AttributeFetchError, FetchResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Property name reported when the document itself cannot be parsed
const DOCUMENT_PROPERTY: &str = "(document)";

#[derive(Debug, Default, Deserialize)]
struct AttributeDocument {
    #[serde(default)]
    resources: HashMap<String, toml::Table>,
}

/// Attribute store reading a TOML file
///
/// The file is re-read on every fetch so edits apply without a restart.
#[derive(Debug, Clone)]
pub struct TomlAttributeStore {
    path: PathBuf,
}

impl TomlAttributeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self, resource: &Resource) -> FetchResult<AttributeDocument> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to read attribute file");
            AttributeFetchError::unavailable(
                resource.id.as_str(),
                format!("{}: {}", self.path.display(), e),
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            AttributeFetchError::malformed(resource.id.as_str(), DOCUMENT_PROPERTY, e.to_string())
        })
    }
}

/// Flatten one property value into its string entries
fn property_values(
    resource: &Resource,
    property: &str,
    value: &toml::Value,
) -> FetchResult<Vec<String>> {
    match value {
        toml::Value::String(s) => Ok(vec![s.clone()]),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                toml::Value::String(s) => Ok(s.clone()),
                other => Err(AttributeFetchError::malformed(
                    resource.id.as_str(),
                    property,
                    format!("expected string entries, found {}", other.type_str()),
                )),
            })
            .collect(),
        other => Err(AttributeFetchError::malformed(
            resource.id.as_str(),
            property,
            format!("expected string or array of strings, found {}", other.type_str()),
        )),
    }
}

#[async_trait]
impl AttributeReader for TomlAttributeStore {
    async fn fetch_attributes(
        &self,
        resource: &Resource,
        action: ActionKind,
    ) -> Result<PolicyAttribute, AttributeFetchError> {
        let document = self.load(resource).await?;

        let Some(properties) = document.resources.get(resource.id.as_str()) else {
            debug!(resource = %resource, "No attributes stored");
            return Ok(PolicyAttribute::empty());
        };

        let set = action.attribute_set();
        let mut pairs = Vec::new();
        for (property, value) in properties {
            if set.classify(property).is_none() {
                continue;
            }
            for entry in property_values(resource, property, value)? {
                pairs.push((property.as_str(), entry));
            }
        }

        Ok(PolicyAttribute::from_properties(
            set,
            pairs.iter().map(|(p, v)| (*p, v.as_str())),
        ))
    }

    fn store_type(&self) -> &'static str {
        "toml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_control::ActorId;
    use std::fs;
    use tempfile::tempdir;

    const ATTRIBUTES: &str = r#"
[resources."Template:Secret"]
"Visible to" = ["users", "whitelist"]
"Visible to group" = "Editors"
___VISIBLE_WL_USER = ["alice", "Bob"]
"Editable by" = "whitelist"
Category = 42
"#;

    #[tokio::test]
    async fn test_reads_policy_for_action() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("acl.toml");
        fs::write(&path, ATTRIBUTES).unwrap();

        let store = TomlAttributeStore::new(&path);
        let resource = Resource::from_title("Template:Secret");

        let read = store
            .fetch_attributes(&resource, ActionKind::Read)
            .await
            .unwrap();
        assert_eq!(read.modes, vec!["users", "whitelist"]);
        assert!(read.whitelist_groups.contains("editors"));
        assert!(read.whitelist_users.contains(&ActorId::new("Alice")));

        let edit = store
            .fetch_attributes(&resource, ActionKind::Edit)
            .await
            .unwrap();
        assert_eq!(edit.modes, vec!["whitelist"]);
        assert!(edit.whitelist_groups.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempdir().unwrap();
        let store = TomlAttributeStore::new(dir.path().join("missing.toml"));

        let err = store
            .fetch_attributes(&Resource::from_title("Secret"), ActionKind::Read)
            .await
            .unwrap_err();
        assert!(matches!(err, AttributeFetchError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_non_string_value_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("acl.toml");
        fs::write(&path, "[resources.Secret]\n\"Visible to\" = [\"users\", 3]\n").unwrap();

        let err = TomlAttributeStore::new(&path)
            .fetch_attributes(&Resource::from_title("Secret"), ActionKind::Read)
            .await
            .unwrap_err();
        match err {
            AttributeFetchError::Malformed { property, .. } => assert_eq!(property, "Visible to"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_document_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("acl.toml");
        fs::write(&path, "[resources\n").unwrap();

        let err = TomlAttributeStore::new(&path)
            .fetch_attributes(&Resource::from_title("Secret"), ActionKind::Read)
            .await
            .unwrap_err();
        assert!(matches!(err, AttributeFetchError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_file_is_reread() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("acl.toml");
        fs::write(&path, "").unwrap();

        let store = TomlAttributeStore::new(&path);
        let resource = Resource::from_title("Secret");
        let before = store
            .fetch_attributes(&resource, ActionKind::Read)
            .await
            .unwrap();
        assert!(before.is_unrestricted());

        fs::write(&path, "[resources.Secret]\n\"Visible to\" = \"users\"\n").unwrap();
        let after = store
            .fetch_attributes(&resource, ActionKind::Read)
            .await
            .unwrap();
        assert_eq!(after.modes, vec!["users"]);
    }
}

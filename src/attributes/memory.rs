//! In-process attribute store

use crate::access_control::{ActionKind, AttributeSet, PolicyAttribute, Resource};
use crate::attributes::reader::AttributeReader;
use crate::error::AttributeFetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Attribute store backed by a map of `(resource id, attribute set)`
///
/// Useful for embedding and tests. Writes are visible to the next fetch.
#[derive(Debug, Default)]
pub struct MemoryAttributeStore {
    policies: RwLock<HashMap<(String, AttributeSet), PolicyAttribute>>,
}

impl MemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_policy(self, resource_id: &str, set: AttributeSet, policy: PolicyAttribute) -> Self {
        self.set_policy(resource_id, set, policy);
        self
    }

    /// Store or replace a policy
    pub fn set_policy(&self, resource_id: &str, set: AttributeSet, policy: PolicyAttribute) {
        self.write().insert((resource_id.to_string(), set), policy);
    }

    /// Remove a policy, returning it if present
    pub fn remove_policy(&self, resource_id: &str, set: AttributeSet) -> Option<PolicyAttribute> {
        self.write().remove(&(resource_id.to_string(), set))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A poisoned lock only means a writer panicked mid-insert; the map is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<(String, AttributeSet), PolicyAttribute>> {
        self.policies.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<(String, AttributeSet), PolicyAttribute>> {
        self.policies.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AttributeReader for MemoryAttributeStore {
    async fn fetch_attributes(
        &self,
        resource: &Resource,
        action: ActionKind,
    ) -> Result<PolicyAttribute, AttributeFetchError> {
        Ok(self
            .read()
            .get(&(resource.id.clone(), action.attribute_set()))
            .cloned()
            .unwrap_or_default())
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_resource_is_empty() {
        let store = MemoryAttributeStore::new();
        let policy = store
            .fetch_attributes(&Resource::from_title("Nothing"), ActionKind::Read)
            .await
            .unwrap();
        assert!(policy.is_unrestricted());
    }

    #[tokio::test]
    async fn test_sets_are_independent() {
        let store = MemoryAttributeStore::new().with_policy(
            "Secret",
            AttributeSet::Editable,
            PolicyAttribute::empty().with_modes(["users"]),
        );
        let resource = Resource::from_title("Secret");

        let read = store
            .fetch_attributes(&resource, ActionKind::Read)
            .await
            .unwrap();
        let edit = store
            .fetch_attributes(&resource, ActionKind::Edit)
            .await
            .unwrap();

        assert!(read.is_unrestricted());
        assert_eq!(edit.modes, vec!["users"]);
    }

    #[tokio::test]
    async fn test_updates_visible_to_next_fetch() {
        let store = MemoryAttributeStore::new();
        let resource = Resource::from_title("Secret");
        store.set_policy(
            "Secret",
            AttributeSet::Visibility,
            PolicyAttribute::empty().with_modes(["public"]),
        );
        assert_eq!(store.len(), 1);

        store.remove_policy("Secret", AttributeSet::Visibility);
        let policy = store
            .fetch_attributes(&resource, ActionKind::Read)
            .await
            .unwrap();
        assert!(policy.is_unrestricted());
        assert!(store.is_empty());
    }
}

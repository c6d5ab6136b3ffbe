//! Attribute reader trait
//!
//! Abstracts the store holding ACL attributes so the guard can be used with
//! an in-process map, a file, or a host database.

use crate::access_control::{ActionKind, PolicyAttribute, Resource};
use crate::error::AttributeFetchError;
// async_trait required for dyn-compatibility with Arc<dyn AttributeReader>
use async_trait::async_trait;
use std::sync::Arc;

/// Source of stored ACL attributes
///
/// Implementations must return fresh data on every call; callers do not
/// expect the reader to cache.
#[async_trait]
pub trait AttributeReader: Send + Sync {
    /// Fetch the policy for `action` on `resource`.
    ///
    /// A resource with nothing stored yields an empty policy, not an error.
    async fn fetch_attributes(
        &self,
        resource: &Resource,
        action: ActionKind,
    ) -> Result<PolicyAttribute, AttributeFetchError>;

    /// Short description of the store (for logging)
    fn store_type(&self) -> &'static str;
}

/// Shared attribute reader
pub type SharedAttributeReader = Arc<dyn AttributeReader>;

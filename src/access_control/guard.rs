//! Host-facing access checks
//!
//! [`AccessGuard`] pairs an evaluator with an attribute reader. Rendering
//! code calls it once per embedded resource and acts on the returned
//! outcome itself; the guard never re-enters rendering.

use crate::access_control::evaluator::{AccessEvaluator, Evaluation};
use crate::access_control::types::{ActionKind, Actor, Resource};
use crate::attributes::{AttributeReader, SharedAttributeReader};
use crate::error::{AccessDeniedError, AppError, AttributeFetchError};
use serde::Serialize;
use tracing::{debug, warn};

/// Placeholder a host renders in place of a denied transclusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialPlaceholder {
    Anonymous,
    Registered,
}

impl DenialPlaceholder {
    pub fn for_actor(actor: &Actor) -> Self {
        if actor.is_anonymous() {
            DenialPlaceholder::Anonymous
        } else {
            DenialPlaceholder::Registered
        }
    }

    /// Message key the host localizes
    pub const fn message_key(&self) -> &'static str {
        match self {
            DenialPlaceholder::Anonymous => "sacl-template-render-denied-anonymous",
            DenialPlaceholder::Registered => "sacl-template-render-denied-registered",
        }
    }
}

/// Outcome of checking a transcluded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transclusion {
    Render,
    Placeholder(DenialPlaceholder),
}

/// Outcome of checking an embedded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEmbed {
    Render,
    /// Show a broken link instead of the file
    Broken,
}

/// Access checks backed by an attribute store
pub struct AccessGuard {
    evaluator: AccessEvaluator,
    reader: SharedAttributeReader,
}

impl AccessGuard {
    pub fn new(evaluator: AccessEvaluator, reader: SharedAttributeReader) -> Self {
        Self { evaluator, reader }
    }

    pub fn evaluator(&self) -> &AccessEvaluator {
        &self.evaluator
    }

    /// Evaluate an action on a resource.
    ///
    /// Attributes are only fetched when the namespace is ACL-enabled. They
    /// are fetched for exempt actors too, so the evaluation reports whether
    /// the resource is restricted. Fetch failures are returned unchanged.
    pub async fn evaluate(
        &self,
        resource: &Resource,
        action: ActionKind,
        actor: &Actor,
    ) -> Result<Evaluation, AttributeFetchError> {
        if let Some(evaluation) = self.evaluator.precheck(resource) {
            return Ok(evaluation);
        }

        let attributes = self
            .reader
            .fetch_attributes(resource, action)
            .await
            .inspect_err(|e| {
                warn!(
                    resource = %resource,
                    action = %action,
                    store = self.reader.store_type(),
                    error = %e,
                    "Failed to fetch ACL attributes"
                )
            })?;

        Ok(self.evaluator.evaluate(resource, action, actor, &attributes))
    }

    /// Whether the actor may perform the action
    pub async fn user_can(
        &self,
        resource: &Resource,
        action: ActionKind,
        actor: &Actor,
    ) -> Result<bool, AttributeFetchError> {
        Ok(self.evaluate(resource, action, actor).await?.is_allowed())
    }

    /// Like [`user_can`](Self::user_can), but a denial becomes an error
    pub async fn require(
        &self,
        resource: &Resource,
        action: ActionKind,
        actor: &Actor,
    ) -> Result<(), AppError> {
        if self.user_can(resource, action, actor).await? {
            Ok(())
        } else {
            Err(AccessDeniedError::not_on_access_list(resource.id.as_str()).into())
        }
    }

    /// Check a resource about to be transcluded into rendered content
    pub async fn check_transclusion(
        &self,
        resource: &Resource,
        actor: &Actor,
    ) -> Result<Transclusion, AttributeFetchError> {
        if self.user_can(resource, ActionKind::Read, actor).await? {
            return Ok(Transclusion::Render);
        }

        let placeholder = DenialPlaceholder::for_actor(actor);
        debug!(
            resource = %resource,
            placeholder = placeholder.message_key(),
            "Transclusion denied"
        );
        Ok(Transclusion::Placeholder(placeholder))
    }

    /// Check a file about to be embedded (images, galleries)
    pub async fn check_file_embed(
        &self,
        resource: &Resource,
        actor: &Actor,
    ) -> Result<FileEmbed, AttributeFetchError> {
        if self.user_can(resource, ActionKind::Read, actor).await? {
            Ok(FileEmbed::Render)
        } else {
            debug!(resource = %resource, "File embed denied");
            Ok(FileEmbed::Broken)
        }
    }

    /// Whether a resource carries restriction modes for an action,
    /// regardless of who is asking.
    ///
    /// Hosts use this to stop caching output shared between actors.
    pub async fn is_restricted(
        &self,
        resource: &Resource,
        action: ActionKind,
    ) -> Result<bool, AttributeFetchError> {
        if !self.evaluator.is_acl_enabled(&resource.namespace) {
            return Ok(false);
        }
        let attributes = self.reader.fetch_attributes(resource, action).await?;
        Ok(!attributes.is_unrestricted())
    }
}

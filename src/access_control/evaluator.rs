//! Access decision algorithm
//!
//! Evaluation order:
//! 1. Resources outside ACL-enabled namespaces are always allowed
//! 2. A resource with no stored mode is unrestricted
//! 3. Exempt actors are always allowed
//! 4. Stored modes are scanned in order: `public` grants immediately,
//!    `users` and `whitelist` each add a restriction the actor must satisfy
//!
//! `public` overrides every restriction wherever it appears, so the final
//! decision does not depend on the order the modes were stored in.
//!
//! `depended_on_restriction` reflects the resource alone: it is set whenever
//! an ACL-enabled resource stores any mode, including for exempt actors.

use crate::access_control::policy::PolicyAttribute;
use crate::access_control::types::{ActionKind, Actor, Mode, Resource};
use crate::config::AclConfig;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Decision::Deny)
    }
}

/// Result of evaluating one (resource, action, actor) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub decision: Decision,
    /// The resource carried restriction modes that were consulted.
    ///
    /// Hosts should not share cached output for such resources across actors.
    pub depended_on_restriction: bool,
    /// First restriction the actor failed, when denied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denied_by: Option<Mode>,
}

impl Evaluation {
    /// Allowed without looking at any stored mode
    pub const fn unrestricted() -> Self {
        Self {
            decision: Decision::Allow,
            depended_on_restriction: false,
            denied_by: None,
        }
    }

    const fn allowed_by_modes() -> Self {
        Self {
            decision: Decision::Allow,
            depended_on_restriction: true,
            denied_by: None,
        }
    }

    const fn exempt() -> Self {
        Self::allowed_by_modes()
    }

    const fn denied(mode: Mode) -> Self {
        Self {
            decision: Decision::Deny,
            depended_on_restriction: true,
            denied_by: Some(mode),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }
}

/// Evaluates stored ACL attributes against an actor
///
/// Holds only the set of ACL-enabled namespaces; every evaluation is a pure
/// function of its arguments, so one evaluator can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct AccessEvaluator {
    /// ACL-enabled namespaces, lower-cased
    namespaces: HashSet<String>,
}

impl AccessEvaluator {
    /// Create an evaluator from configuration
    pub fn new(config: &AclConfig) -> Self {
        Self::with_namespaces(config.enabled_namespaces())
    }

    pub fn with_namespaces<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            namespaces: namespaces
                .into_iter()
                .map(|ns| ns.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn is_acl_enabled(&self, namespace: &str) -> bool {
        self.namespaces.contains(&namespace.trim().to_lowercase())
    }

    /// Checks that need no stored attributes.
    ///
    /// Returns `Some` when the namespace is not ACL-enabled; `None` means the
    /// attributes must be fetched and evaluated.
    pub fn precheck(&self, resource: &Resource) -> Option<Evaluation> {
        if !self.is_acl_enabled(&resource.namespace) {
            trace!(
                resource = %resource,
                namespace = %resource.namespace,
                "Namespace is not ACL-enabled"
            );
            return Some(Evaluation::unrestricted());
        }

        None
    }

    /// Evaluate a resource's stored attributes for an actor
    pub fn evaluate(
        &self,
        resource: &Resource,
        action: ActionKind,
        actor: &Actor,
        attributes: &PolicyAttribute,
    ) -> Evaluation {
        if let Some(evaluation) = self.precheck(resource) {
            return evaluation;
        }

        if actor.is_exempt() && !attributes.is_unrestricted() {
            trace!(resource = %resource, "Actor is exempt from ACLs");
            return Evaluation::exempt();
        }

        let evaluation = Self::decide(actor, attributes);
        debug!(
            resource = %resource,
            action = %action,
            anonymous = actor.is_anonymous(),
            decision = ?evaluation.decision,
            denied_by = ?evaluation.denied_by,
            "Evaluated ACL"
        );
        evaluation
    }

    /// Apply the stored modes to an actor, skipping namespace and exemption checks
    pub fn decide(actor: &Actor, attributes: &PolicyAttribute) -> Evaluation {
        if attributes.is_unrestricted() {
            return Evaluation::unrestricted();
        }

        let mut failed: Option<Mode> = None;

        for mode in attributes.parsed_modes() {
            match mode {
                Mode::Public => {
                    trace!("Public mode overrides restrictions");
                    return Evaluation::allowed_by_modes();
                }
                Mode::Users => {
                    if actor.is_anonymous() {
                        trace!("Anonymous actor fails users restriction");
                        failed = failed.or(Some(Mode::Users));
                    }
                }
                Mode::Whitelist => {
                    if !attributes.is_whitelisted(actor) {
                        trace!("Actor is not whitelisted");
                        failed = failed.or(Some(Mode::Whitelist));
                    }
                }
            }
        }

        match failed {
            Some(mode) => Evaluation::denied(mode),
            None => Evaluation::allowed_by_modes(),
        }
    }
}

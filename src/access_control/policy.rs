//! Stored ACL attributes for one resource and one action

use crate::access_control::types::{Actor, ActorId, AttributeSet, Mode, PropertyRole};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Mode tokens and whitelists read from an attribute store.
///
/// `modes` keeps the raw tokens in stored order; unrecognized tokens are
/// kept here and skipped during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAttribute {
    #[serde(default)]
    pub modes: Vec<String>,

    /// Whitelisted group names, matched ignoring case
    #[serde(default)]
    pub whitelist_groups: BTreeSet<String>,

    #[serde(default)]
    pub whitelist_users: BTreeSet<ActorId>,
}

impl PolicyAttribute {
    /// Policy with no restriction
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modes.extend(modes.into_iter().map(Into::into));
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for group in groups {
            self.add_group(group.as_ref());
        }
        self
    }

    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for user in users {
            self.add_user(user.as_ref());
        }
        self
    }

    /// Assemble a policy from raw property/value pairs.
    ///
    /// Properties may be named by canonical key or alias; anything that
    /// does not belong to `set` is skipped.
    pub fn from_properties<'a, I>(set: AttributeSet, properties: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut policy = Self::empty();
        for (property, value) in properties {
            match set.classify(property) {
                Some(PropertyRole::Mode) => policy.modes.push(value.to_string()),
                Some(PropertyRole::WhitelistGroup) => policy.add_group(value),
                Some(PropertyRole::WhitelistUser) => policy.add_user(value),
                None => {}
            }
        }
        policy
    }

    fn add_group(&mut self, group: &str) {
        let group = group.trim();
        if !group.is_empty() {
            self.whitelist_groups.insert(group.to_lowercase());
        }
    }

    fn add_user(&mut self, user: &str) {
        let id = ActorId::new(user);
        if !id.as_str().is_empty() {
            self.whitelist_users.insert(id);
        }
    }

    /// No mode value is stored
    pub fn is_unrestricted(&self) -> bool {
        self.modes.is_empty()
    }

    /// Recognized modes in stored order
    pub fn parsed_modes(&self) -> impl Iterator<Item = Mode> + '_ {
        self.modes.iter().filter_map(|token| Mode::try_parse(token))
    }

    /// Whether the actor is in the whitelisted groups or users
    pub fn is_whitelisted(&self, actor: &Actor) -> bool {
        // Entries may arrive unnormalized through serde or direct insertion
        let by_group = self.whitelist_groups.iter().any(|listed| {
            let listed = listed.trim().to_lowercase();
            actor.effective_groups().any(|group| group == listed)
        });

        by_group
            || actor
                .id()
                .is_some_and(|id| self.whitelist_users.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_properties_with_aliases() {
        let policy = PolicyAttribute::from_properties(
            AttributeSet::Visibility,
            [
                ("Visible to", "whitelist"),
                ("___VISIBLE_WL_GROUP", "Editors"),
                ("visible to user", "alice"),
                ("Editable by", "users"),
                ("Category", "Secrets"),
            ],
        );

        assert_eq!(policy.modes, vec!["whitelist"]);
        assert!(policy.whitelist_groups.contains("editors"));
        assert!(policy.whitelist_users.contains(&ActorId::new("Alice")));
        assert_eq!(policy.whitelist_groups.len(), 1);
    }

    #[test]
    fn test_parsed_modes_skip_unknown() {
        let policy = PolicyAttribute::empty().with_modes(["Users", "nobody", "PUBLIC"]);
        let modes: Vec<_> = policy.parsed_modes().collect();
        assert_eq!(modes, vec![Mode::Users, Mode::Public]);
        assert!(!policy.is_unrestricted());
    }

    #[test]
    fn test_whitelisted_by_user_only() {
        let policy = PolicyAttribute::empty().with_users(["Alice"]);
        assert!(policy.is_whitelisted(&Actor::registered("alice")));
        assert!(!policy.is_whitelisted(&Actor::registered("bob")));
        assert!(!policy.is_whitelisted(&Actor::anonymous()));
    }

    #[test]
    fn test_deserialized_groups_match_ignoring_case() {
        let policy: PolicyAttribute = serde_json::from_str(
            r#"{"modes":["whitelist"],"whitelist_groups":["Editors"," SYSOP "]}"#,
        )
        .unwrap();

        assert!(policy.is_whitelisted(&Actor::registered("Eve").with_groups(["editors"])));
        assert!(policy.is_whitelisted(&Actor::registered("Root").with_groups(["Sysop"])));
        assert!(!policy.is_whitelisted(&Actor::registered("Bob").with_groups(["readers"])));
    }

    #[test]
    fn test_whitelisted_by_implicit_group() {
        let policy = PolicyAttribute::empty().with_groups(["user"]);
        assert!(policy.is_whitelisted(&Actor::registered("Bob")));
        assert!(!policy.is_whitelisted(&Actor::anonymous()));
    }
}

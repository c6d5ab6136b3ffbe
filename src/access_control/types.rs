//! Access control types
//!
//! Core types used by the access control system: the requested action,
//! restriction modes, resources and actors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Namespace assigned to titles without a prefix
pub const MAIN_NAMESPACE: &str = "Main";

/// Namespaces every host knows about, recognized as title prefixes
/// without configuration
pub const STANDARD_NAMESPACES: &[&str] = &[
    "Talk",
    "User",
    "User talk",
    "Project",
    "Project talk",
    "File",
    "File talk",
    "MediaWiki",
    "MediaWiki talk",
    "Template",
    "Template talk",
    "Help",
    "Help talk",
    "Category",
    "Category talk",
    "Special",
    "Media",
];

/// Group every actor belongs to, registered or not
pub const ALL_GROUP: &str = "*";

/// Group every registered actor belongs to
pub const USER_GROUP: &str = "user";

/// Action requested on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// View the resource, including transclusion and file embedding
    Read,
    /// Modify the resource
    Edit,
}

impl ActionKind {
    /// Attribute set consulted for this action
    pub const fn attribute_set(&self) -> AttributeSet {
        match self {
            ActionKind::Read => AttributeSet::Visibility,
            ActionKind::Edit => AttributeSet::Editable,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Read => "read",
            ActionKind::Edit => "edit",
        }
    }

    /// Try to parse an action from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Some(ActionKind::Read),
            "edit" => Some(ActionKind::Edit),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Group of stored properties describing one policy (read or edit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeSet {
    Visibility,
    Editable,
}

impl AttributeSet {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AttributeSet::Visibility => "visibility",
            AttributeSet::Editable => "editable",
        }
    }

    /// Canonical key of the mode property
    pub const fn mode_key(&self) -> &'static str {
        match self {
            AttributeSet::Visibility => "___VISIBLE",
            AttributeSet::Editable => "___EDITABLE",
        }
    }

    /// Canonical key of the whitelisted-groups property
    pub const fn group_key(&self) -> &'static str {
        match self {
            AttributeSet::Visibility => "___VISIBLE_WL_GROUP",
            AttributeSet::Editable => "___EDITABLE_WL_GROUP",
        }
    }

    /// Canonical key of the whitelisted-users property
    pub const fn user_key(&self) -> &'static str {
        match self {
            AttributeSet::Visibility => "___VISIBLE_WL_USER",
            AttributeSet::Editable => "___EDITABLE_WL_USER",
        }
    }

    /// Human-readable alias of the mode property
    pub const fn mode_alias(&self) -> &'static str {
        match self {
            AttributeSet::Visibility => "Visible to",
            AttributeSet::Editable => "Editable by",
        }
    }

    pub const fn group_alias(&self) -> &'static str {
        match self {
            AttributeSet::Visibility => "Visible to group",
            AttributeSet::Editable => "Editable by group",
        }
    }

    pub const fn user_alias(&self) -> &'static str {
        match self {
            AttributeSet::Visibility => "Visible to user",
            AttributeSet::Editable => "Editable by user",
        }
    }

    /// Resolve a property name (canonical key or alias) to its role in this set
    pub fn classify(&self, property: &str) -> Option<PropertyRole> {
        let property = property.trim();
        if property == self.mode_key() || property.eq_ignore_ascii_case(self.mode_alias()) {
            Some(PropertyRole::Mode)
        } else if property == self.group_key()
            || property.eq_ignore_ascii_case(self.group_alias())
        {
            Some(PropertyRole::WhitelistGroup)
        } else if property == self.user_key() || property.eq_ignore_ascii_case(self.user_alias())
        {
            Some(PropertyRole::WhitelistUser)
        } else {
            None
        }
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a stored property contributes to a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRole {
    Mode,
    WhitelistGroup,
    WhitelistUser,
}

/// Restriction mode attached to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Anyone, overriding every other restriction
    Public,
    /// Registered actors only
    Users,
    /// Whitelisted groups and users only
    Whitelist,
}

impl Mode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mode::Public => "public",
            Mode::Users => "users",
            Mode::Whitelist => "whitelist",
        }
    }

    /// Parse a stored mode token, ignoring case.
    ///
    /// Unrecognized tokens yield `None`; callers skip them.
    pub fn try_parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "public" => Some(Mode::Public),
            "users" => Some(Mode::Users),
            "whitelist" => Some(Mode::Whitelist),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A protected resource: a title inside a namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// Full title, including any namespace prefix
    pub id: String,
    /// Namespace classifier
    pub namespace: String,
}

impl Resource {
    pub fn new(id: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            namespace: namespace.into(),
        }
    }

    /// Build a resource from a prefixed title such as `Template:Secret`.
    ///
    /// Only [`STANDARD_NAMESPACES`] are recognized as prefixes; see
    /// [`from_title_in`](Self::from_title_in).
    pub fn from_title(title: &str) -> Self {
        Self::from_title_in::<_, &str>(title, [])
    }

    /// Build a resource from a title, recognizing the standard namespaces
    /// plus `namespaces` as prefixes.
    ///
    /// A prefix that names no known namespace is part of the title, so
    /// `Star Wars: Episode IV` stays in the main namespace. Prefixes match
    /// ignoring case, with `_` and space treated alike.
    pub fn from_title_in<I, S>(title: &str, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let title = title.trim();
        let Some((prefix, rest)) = title.split_once(':') else {
            return Self::new(title, MAIN_NAMESPACE);
        };
        if rest.trim().is_empty() {
            return Self::new(title, MAIN_NAMESPACE);
        }

        let prefix = prefix.trim().replace('_', " ");
        let matches = |known: &str| known.trim().replace('_', " ").eq_ignore_ascii_case(&prefix);

        let configured = namespaces
            .into_iter()
            .find(|ns| matches(ns.as_ref()))
            .map(|ns| ns.as_ref().trim().to_string());
        let namespace = configured.or_else(|| {
            STANDARD_NAMESPACES
                .iter()
                .find(|ns| matches(**ns))
                .map(|ns| ns.to_string())
        });

        match namespace {
            Some(namespace) => Self::new(title, namespace),
            None => Self::new(title, MAIN_NAMESPACE),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Canonical actor identifier.
///
/// Surrounding whitespace is dropped, spaces and underscores are treated
/// alike and the first letter is upper-cased, so `alice_smith` and
/// `Alice smith` name the same actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    pub fn new(raw: &str) -> Self {
        let collapsed = raw
            .trim()
            .split(['_', ' '])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let mut chars = collapsed.chars();
        let canonical = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ActorId {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for ActorId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity requesting an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: Option<ActorId>,
    groups: BTreeSet<String>,
    exempt: bool,
}

impl Actor {
    /// An anonymous visitor
    pub fn anonymous() -> Self {
        Self {
            id: None,
            groups: BTreeSet::new(),
            exempt: false,
        }
    }

    /// A registered actor with the given identifier.
    ///
    /// An identifier that is empty once canonicalized yields an anonymous actor.
    pub fn registered(id: impl Into<ActorId>) -> Self {
        let id: ActorId = id.into();
        Self {
            id: (!id.as_str().is_empty()).then_some(id),
            groups: BTreeSet::new(),
            exempt: false,
        }
    }

    /// Add explicit group memberships (stored lower-cased)
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.groups.extend(
            groups
                .into_iter()
                .map(|g| g.as_ref().trim().to_lowercase())
                .filter(|g| !g.is_empty()),
        );
        self
    }

    /// Mark the actor as holding the exemption capability
    pub fn with_exempt(mut self, exempt: bool) -> Self {
        self.exempt = exempt;
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_exempt(&self) -> bool {
        self.exempt
    }

    pub fn id(&self) -> Option<&ActorId> {
        self.id.as_ref()
    }

    /// Explicit group memberships
    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Explicit groups plus the implicit `*` and, for registered actors, `user`
    pub fn effective_groups(&self) -> impl Iterator<Item = &str> {
        let implicit: &[&str] = if self.is_anonymous() {
            &[ALL_GROUP]
        } else {
            &[ALL_GROUP, USER_GROUP]
        };
        implicit
            .iter()
            .copied()
            .chain(self.groups.iter().map(String::as_str))
    }
}

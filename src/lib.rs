//! Semantic ACL
//!
//! Per-resource read and edit restrictions driven by ACL attributes stored
//! alongside each resource.
//!
//! ## Features
//!
//! - **Three modes** - `public`, `users` and `whitelist`, combinable on one resource
//! - **Group and user whitelists** with case-insensitive group matching
//! - **Exemption right** that bypasses every check for privileged groups
//! - **Pluggable attribute stores** - in-memory map or TOML file
//! - **Host checks** for transclusion placeholders and broken file embeds
//!
//! ## Decision Model
//!
//! ```text
//! namespace not ACL-enabled → allow
//! actor exempt              → allow
//! no modes stored           → allow
//! `public` anywhere         → allow
//! any failed restriction    → deny
//! otherwise                 → allow
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [acl.namespaces]
//! Main = true
//! Template = true
//!
//! [acl.group_rights]
//! sysop = ["sacl-exempt"]
//!
//! [store]
//! path = "~/.config/semantic-acl/attributes.toml"
//! ```

pub mod access_control;
pub mod attributes;
pub mod config;
pub mod error;

// Re-export main types
pub use access_control::{AccessEvaluator, AccessGuard, ActionKind, Actor, Evaluation, Resource};
pub use attributes::{AttributeReader, create_attribute_reader};
pub use config::{AppConfig, load_config};
pub use error::{AppError, AttributeFetchError, Result};

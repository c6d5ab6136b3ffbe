//! Access control module
//!
//! Decides whether an actor may read or edit a resource from the ACL
//! attributes stored on that resource.
//!
//! ## Access Control Model
//!
//! Each resource carries two independent policies, one for reading
//! (`Visible to`) and one for editing (`Editable by`). A policy is a list
//! of modes plus whitelisted groups and users:
//!
//! - `users` - the actor must be registered
//! - `whitelist` - the actor must be in a whitelisted group or be a whitelisted user
//! - `public` - anyone, overriding every other mode on the same policy
//!
//! Several modes may be stored at once; each `users`/`whitelist` entry is
//! a restriction the actor must satisfy. Unknown modes are ignored.
//!
//! Resources outside ACL-enabled namespaces and actors holding the
//! exemption right bypass the policy entirely.
//!
//! ## Example Attributes
//!
//! ```toml
//! [resources."Project plan"]
//! "Visible to" = ["users", "whitelist"]
//! "Visible to group" = ["planners"]
//! "Visible to user" = ["Alice"]
//! "Editable by" = "whitelist"
//! "Editable by group" = "sysop"
//! ```

pub mod evaluator;
pub mod guard;
pub mod policy;
pub mod types;

pub use evaluator::{AccessEvaluator, Decision, Evaluation};
pub use guard::{AccessGuard, DenialPlaceholder, FileEmbed, Transclusion};
pub use policy::PolicyAttribute;
pub use types::{ActionKind, Actor, ActorId, AttributeSet, Mode, Resource};

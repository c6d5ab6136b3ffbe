//! Error types for semantic-acl
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API;
//! the binary converts them to `anyhow` at the boundary.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Attribute store error: {0}")]
    Attributes(#[from] AttributeFetchError),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDeniedError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// Failure to read ACL attributes for a resource.
///
/// The evaluator never masks these: whether an unreadable store means
/// allow or deny is a decision the host makes explicitly.
#[derive(Error, Debug)]
pub enum AttributeFetchError {
    #[error("Attribute store unavailable for '{resource}': {reason}")]
    Unavailable { resource: String, reason: String },

    #[error("Malformed attribute '{property}' on '{resource}': {reason}")]
    Malformed {
        resource: String,
        property: String,
        reason: String,
    },
}

impl AttributeFetchError {
    pub fn unavailable(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(
        resource: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            resource: resource.into(),
            property: property.into(),
            reason: reason.into(),
        }
    }
}

/// Access control errors
#[derive(Error, Debug)]
#[error("Access denied to '{resource}': {reason}")]
pub struct AccessDeniedError {
    pub resource: String,
    pub reason: String,
}

impl AccessDeniedError {
    /// Message shown when an actor is not on a resource's access list
    pub const NOT_ON_ACCESS_LIST: &'static str = "You are not on the access list for this page.";

    pub fn new(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn not_on_access_list(resource: impl Into<String>) -> Self {
        Self::new(resource, Self::NOT_ON_ACCESS_LIST)
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for attribute store operations
pub type FetchResult<T> = std::result::Result<T, AttributeFetchError>;

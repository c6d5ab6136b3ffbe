//! Attribute stores
//!
//! Provides the readers the access guard fetches ACL attributes from.
//! Two stores ship with the crate: an in-process map and a TOML file.

pub mod file;
pub mod memory;
pub mod reader;

pub use file::TomlAttributeStore;
pub use memory::MemoryAttributeStore;
pub use reader::{AttributeReader, SharedAttributeReader};

use crate::config::StoreConfig;
use std::sync::Arc;
use tracing::info;

/// Create an attribute reader from configuration
///
/// Without a configured file an empty in-memory store is used, which
/// leaves every resource unrestricted.
pub fn create_attribute_reader(config: &StoreConfig) -> SharedAttributeReader {
    let reader: SharedAttributeReader = match &config.path {
        Some(path) => {
            let expanded = shellexpand::tilde(path).into_owned();
            info!(path = %expanded, "Using TOML attribute store");
            Arc::new(TomlAttributeStore::new(expanded))
        }
        None => {
            info!("No attribute file configured, using empty in-memory store");
            Arc::new(MemoryAttributeStore::new())
        }
    };
    reader
}

//! Schema configuration.

use serde::{Deserialize, Serialize};

/// Options fixed when a schema is built.
///
/// Deserializable so applications can keep it next to their own settings;
/// missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Report top-level input keys that no key rule declares.
    pub validate_keys: bool,
}

impl SchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_keys(mut self, enabled: bool) -> Self {
        self.validate_keys = enabled;
        self
    }
}

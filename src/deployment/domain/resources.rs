//! Dynamic resource description types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Description of one dynamically discovered node resource.
///
/// Reserved for the resource-introspection contract; the current manager
/// deterministically reports that contract as unimplemented, so no adapter
/// produces these values yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    name: String,
    kind: String,
    value: Value,
}

impl ResourceDescriptor {
    /// Creates a resource descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            value,
        }
    }

    /// Returns the resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resource kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the resource value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

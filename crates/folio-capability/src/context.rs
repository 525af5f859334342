//! Call-time context passed through to providers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional caller/session information.
///
/// Read-only once built: the resolver hands it to providers unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityContext(Map<String, Value>);

impl CapabilityContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Requested locale, when the caller supplied one.
    pub fn locale(&self) -> Option<&str> {
        self.get_str("locale")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for CapabilityContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

//! Capability keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, versioned capability identifier, e.g. `projects.visible.v1`.
///
/// The value is opaque to the registry; [`namespace`](Self::namespace) and
/// [`version`](Self::version) are read-only conveniences for introspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityKey(String);

impl CapabilityKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading dotted segment (`projects` for `projects.visible.v1`).
    pub fn namespace(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }

    /// Trailing `vN` segment, if present.
    pub fn version(&self) -> Option<u32> {
        let last = self.0.rsplit('.').next()?;
        last.strip_prefix('v')?.parse().ok()
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CapabilityKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for CapabilityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

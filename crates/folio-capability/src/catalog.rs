//! Capability catalog: in-memory store of definitions and providers.
//!
//! Populated once at startup by [`CapabilityModule`]s and read-only after
//! that. Registration is append/replace only: registering a key twice keeps
//! the last registration.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::definition::CapabilityDefinition;
use crate::error::ValidationError;
use crate::key::CapabilityKey;
use crate::provider::{CapabilityProvider, RegisteredCapability};

/// Read surface of a capability store.
pub trait CapabilityRegistry: Send + Sync {
    fn has(&self, key: &str) -> bool;

    /// Definition last registered for `key`.
    fn get(&self, key: &str) -> Option<&CapabilityDefinition>;

    fn provider(&self, key: &str) -> Option<Arc<dyn CapabilityProvider>>;

    /// Definition and provider pair, when both are present.
    fn registered(&self, key: &str) -> Option<RegisteredCapability> {
        let definition = self.get(key)?.clone();
        let provider = self.provider(key)?;
        Some(RegisteredCapability::new(definition, provider))
    }

    /// Every definition, ordered by key.
    fn all_definitions(&self) -> Vec<&CapabilityDefinition>;

    /// Definitions flagged public, ordered by key.
    fn public_definitions(&self) -> Vec<&CapabilityDefinition> {
        self.all_definitions().into_iter().filter(|d| d.public).collect()
    }
}

/// A domain module that publishes capabilities at boot.
pub trait CapabilityModule {
    fn name(&self) -> &str;

    fn register(&self, catalog: &mut CapabilityCatalog) -> Result<(), ValidationError>;
}

/// Map-backed capability store.
#[derive(Default, Clone)]
pub struct CapabilityCatalog {
    definitions: BTreeMap<String, CapabilityDefinition>,
    providers: HashMap<String, Arc<dyn CapabilityProvider>>,
}

impl CapabilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a definition together with its provider, replacing any prior
    /// registration under the same key.
    pub fn register(
        &mut self,
        definition: CapabilityDefinition,
        provider: Arc<dyn CapabilityProvider>,
    ) -> Result<(), ValidationError> {
        let key = definition.key.as_str().to_string();
        self.define(definition)?;
        self.providers.insert(key, provider);
        Ok(())
    }

    /// Store a definition without a provider.
    pub fn define(&mut self, definition: CapabilityDefinition) -> Result<(), ValidationError> {
        definition.validate()?;
        let key = definition.key.as_str().to_string();
        if self.definitions.insert(key.clone(), definition).is_some() {
            warn!(capability = %key, "capability re-registered, replacing prior definition");
        } else {
            debug!(capability = %key, "capability registered");
        }
        Ok(())
    }

    /// Attach (or replace) the provider for `key`.
    pub fn provide(&mut self, key: impl Into<CapabilityKey>, provider: Arc<dyn CapabilityProvider>) {
        let key = key.into();
        debug!(capability = %key, "provider attached");
        self.providers.insert(key.as_str().to_string(), provider);
    }

    /// Let a module register its capabilities.
    pub fn install(&mut self, module: &dyn CapabilityModule) -> Result<(), ValidationError> {
        let before = self.definitions.len();
        module.register(self)?;
        info!(
            module = module.name(),
            added = self.definitions.len() - before,
            total = self.definitions.len(),
            "capability module installed"
        );
        Ok(())
    }

    /// Definitions whose key starts with `namespace.`.
    pub fn definitions_in(&self, namespace: &str) -> Vec<&CapabilityDefinition> {
        self.definitions
            .values()
            .filter(|d| d.key.namespace() == namespace)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl CapabilityRegistry for CapabilityCatalog {
    fn has(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&CapabilityDefinition> {
        self.definitions.get(key)
    }

    fn provider(&self, key: &str) -> Option<Arc<dyn CapabilityProvider>> {
        self.providers.get(key).cloned()
    }

    fn all_definitions(&self) -> Vec<&CapabilityDefinition> {
        self.definitions.values().collect()
    }
}

//! Template registry: templates keyed by template key.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::definition::TemplateDefinition;
use crate::error::{TemplateError, TemplateResult};

/// In-memory template store, built at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, TemplateDefinition>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a template. Re-registering a key replaces it.
    pub fn register(&mut self, definition: TemplateDefinition) -> TemplateResult<()> {
        definition.validate()?;
        let key = definition.key.clone();
        if self.templates.insert(key.clone(), definition).is_some() {
            warn!(template = %key, "template re-registered, replacing prior definition");
        } else {
            debug!(template = %key, "template registered");
        }
        Ok(())
    }

    pub fn register_all(
        &mut self,
        definitions: impl IntoIterator<Item = TemplateDefinition>,
    ) -> TemplateResult<()> {
        definitions.into_iter().try_for_each(|d| self.register(d))
    }

    pub fn has(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&TemplateDefinition> {
        self.templates.get(key)
    }

    pub fn require(&self, key: &str) -> TemplateResult<&TemplateDefinition> {
        self.get(key)
            .ok_or_else(|| TemplateError::NotFound(key.to_string()))
    }

    /// All templates ordered by key.
    pub fn all(&self) -> impl Iterator<Item = &TemplateDefinition> {
        self.templates.values()
    }

    /// Templates allowed in `slot`.
    pub fn for_slot<'a>(&'a self, slot: &'a str) -> impl Iterator<Item = &'a TemplateDefinition> + 'a {
        self.templates.values().filter(move |t| t.accepts_slot(slot))
    }

    /// Templates contributed by `origin`.
    pub fn by_origin<'a>(&'a self, origin: &'a str) -> impl Iterator<Item = &'a TemplateDefinition> + 'a {
        self.templates.values().filter(move |t| t.origin == origin)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

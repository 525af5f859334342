//! folio-modules: the portfolio domain modules.
//!
//! Each module publishes capabilities over a shared [`ContentLibrary`]:
//!
//! | Module | Capability |
//! |---|---|
//! | pages | `pages.navigation.v1` |
//! | projects | `projects.visible.v1` |
//! | experiences | `experiences.timeline.v1` |
//! | skills | `skills.grouped.v1` |
//! | courses | `courses.completed.v1` |
//!
//! [`templates::builtin_templates`] provides the section templates that
//! consume them.

pub mod content;
pub mod modules;
pub mod templates;

use std::sync::Arc;

use folio_capability::{CapabilityCatalog, ValidationError};
use folio_template::{TemplateRegistry, TemplateResult};

pub use content::ContentLibrary;

/// Install every portfolio module into `catalog`.
pub fn install_all(catalog: &mut CapabilityCatalog, library: Arc<ContentLibrary>) -> Result<(), ValidationError> {
    for module in modules::all(library) {
        catalog.install(module.as_ref())?;
    }
    Ok(())
}

/// Registry holding the built-in templates.
pub fn builtin_template_registry() -> TemplateResult<TemplateRegistry> {
    let mut registry = TemplateRegistry::new();
    registry.register_all(templates::builtin_templates())?;
    Ok(registry)
}

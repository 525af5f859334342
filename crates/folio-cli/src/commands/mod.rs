pub mod catalog;
pub mod init;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use folio_capability::{CapabilityCatalog, CapabilityParameterValidator, CapabilityResolver};
use folio_core::FolioConfig;
use folio_modules::ContentLibrary;

/// Load `path`, or fall back to defaults when it does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<FolioConfig> {
    if !path.exists() {
        return Ok(FolioConfig::default());
    }
    FolioConfig::from_file(path).with_context(|| format!("loading {}", path.display()))
}

/// Content named by `[content].path`, or an empty library.
pub fn load_library(config: &FolioConfig) -> anyhow::Result<ContentLibrary> {
    match &config.content.path {
        Some(path) => {
            let library = ContentLibrary::from_file(path)?;
            info!(
                path = %path.display(),
                pages = library.pages.len(),
                sections = library.sections.len(),
                "content loaded"
            );
            Ok(library)
        }
        None => {
            debug!("no content path configured, starting empty");
            Ok(ContentLibrary::default())
        }
    }
}

/// Catalog with every portfolio module installed, behind a resolver that
/// validates with the configured options.
pub fn build_resolver(config: &FolioConfig, library: Arc<ContentLibrary>) -> anyhow::Result<CapabilityResolver> {
    let mut catalog = CapabilityCatalog::new();
    folio_modules::install_all(&mut catalog, library).context("installing capability modules")?;
    let validator = CapabilityParameterValidator::new(config.capabilities.into());
    Ok(CapabilityResolver::new(Arc::new(catalog), validator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_capability::CapabilityRegistry;

    #[test]
    fn missing_config_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/folio.toml")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert!(config.content.path.is_none());
    }

    #[test]
    fn resolver_has_every_module() {
        let resolver = build_resolver(&FolioConfig::default(), Arc::new(ContentLibrary::default())).unwrap();
        for key in [
            "pages.navigation.v1",
            "projects.visible.v1",
            "experiences.timeline.v1",
            "skills.grouped.v1",
            "courses.completed.v1",
        ] {
            assert!(resolver.registry().has(key), "{key}");
        }
    }
}

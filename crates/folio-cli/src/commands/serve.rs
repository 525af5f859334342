use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use folio_api::{ApiState, SectionStore};
use folio_capability::CapabilityRegistry;
use folio_core::FolioConfig;

use super::{build_resolver, load_library};

pub async fn serve(config: FolioConfig, bind: Option<String>) -> anyhow::Result<()> {
    info!(site = %config.site.name, "Folio starting");

    let library = Arc::new(load_library(&config)?);
    let sections = SectionStore::from_sections(library.sections.iter().cloned());
    let resolver = build_resolver(&config, library)?;
    info!(capabilities = resolver.registry().all_definitions().len(), "capability catalog ready");

    let templates = folio_modules::builtin_template_registry()?;
    info!(templates = templates.len(), "template registry ready");

    let router = folio_api::build_router(ApiState::new(resolver, templates, sections));

    let bind = bind.unwrap_or(config.server.bind);
    let addr: SocketAddr = bind.parse().with_context(|| format!("invalid bind address {bind}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("Folio stopped");
    Ok(())
}

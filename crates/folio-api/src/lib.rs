//! folio-api: REST API for Folio.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/capabilities` | List public capability definitions |
//! | GET | `/api/v1/capabilities/{key}` | Get one public definition |
//! | POST | `/api/v1/capabilities/resolve` | Resolve one capability |
//! | POST | `/api/v1/capabilities/resolve-many` | Resolve a batch, fail-fast |
//! | GET | `/api/v1/templates` | List templates (`?slot=`) |
//! | GET | `/api/v1/templates/{key}` | Get one template |
//! | GET | `/api/v1/templates/{key}/rules` | Validation rules (`?root=`) |
//! | GET | `/api/v1/pages/{page_id}/sections` | Sections in display order (`?visible_at=`, `?locale=`) |
//! | GET | `/api/v1/pages/{page_id}/sections/{id}/fields` | Composed, resolved fields |
//! | POST | `/api/v1/pages/{page_id}/sections/reorder` | Persist a full order |

pub mod handlers;
pub mod section_handlers;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use folio_capability::CapabilityResolver;
use folio_template::TemplateRegistry;

pub use store::SectionStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub resolver: CapabilityResolver,
    pub templates: Arc<TemplateRegistry>,
    pub sections: SectionStore,
}

impl ApiState {
    pub fn new(resolver: CapabilityResolver, templates: TemplateRegistry, sections: SectionStore) -> Self {
        Self {
            resolver,
            templates: Arc::new(templates),
            sections,
        }
    }
}

/// Build the complete API router.
pub fn build_router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/capabilities", get(handlers::list_capabilities))
        .route("/capabilities/resolve", post(handlers::resolve_capability))
        .route("/capabilities/resolve-many", post(handlers::resolve_many))
        .route("/capabilities/{key}", get(handlers::get_capability))
        .route("/templates", get(handlers::list_templates))
        .route("/templates/{key}", get(handlers::get_template))
        .route("/templates/{key}/rules", get(handlers::template_rules))
        .route("/pages/{page_id}/sections", get(section_handlers::list_sections))
        .route(
            "/pages/{page_id}/sections/reorder",
            post(section_handlers::reorder_sections),
        )
        .route(
            "/pages/{page_id}/sections/{id}/fields",
            get(section_handlers::section_fields),
        )
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}

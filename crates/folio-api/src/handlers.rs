//! Capability and template handlers.
//!
//! Every response uses the `{success, data?, error?, errors?}` envelope.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use folio_capability::{CapabilityContext, CapabilityError, CapabilityRegistry, Parameters, ResolveRequest};
use folio_template::{TemplateError, TemplateValidationService};

use crate::ApiState;

/// Field name → messages, as returned with validation failures.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
pub(crate) struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    pub(crate) fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        })
    }
}

pub(crate) fn error_response(msg: &str, status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
            errors: None,
        }),
    )
        .into_response()
}

pub(crate) fn validation_response(msg: &str, errors: FieldErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
            errors: Some(errors),
        }),
    )
        .into_response()
}

/// Map a resolution failure onto a status code.
pub(crate) fn capability_error_response(err: &CapabilityError) -> Response {
    match err {
        CapabilityError::Validation(e) => {
            let mut errors = FieldErrors::new();
            errors
                .entry(e.parameter().unwrap_or("parameters").to_string())
                .or_default()
                .push(e.to_string());
            validation_response(&e.to_string(), errors)
        }
        CapabilityError::NotFound { .. } => error_response(&err.to_string(), StatusCode::NOT_FOUND),
        CapabilityError::Execution { .. } => {
            warn!(error = %err, "capability execution failed");
            error_response(&err.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub(crate) fn template_error_response(err: &TemplateError) -> Response {
    match err {
        TemplateError::Capability(e) => capability_error_response(e),
        TemplateError::NotFound(_) => error_response(&err.to_string(), StatusCode::NOT_FOUND),
        TemplateError::InvalidDefinition { .. } | TemplateError::InvalidRule { .. } => {
            error_response(&err.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// ── Capabilities ───────────────────────────────────────────────

/// GET /api/v1/capabilities
pub async fn list_capabilities(State(state): State<ApiState>) -> impl IntoResponse {
    ApiResponse::ok(state.resolver.registry().public_definitions()).into_response()
}

/// GET /api/v1/capabilities/{key}
///
/// Only public definitions are exposed, matching the listing.
pub async fn get_capability(State(state): State<ApiState>, Path(key): Path<String>) -> impl IntoResponse {
    match state.resolver.registry().get(&key).filter(|d| d.public) {
        Some(definition) => ApiResponse::ok(definition).into_response(),
        None => error_response("capability not found", StatusCode::NOT_FOUND),
    }
}

/// Single resolution request body.
#[derive(Debug, Deserialize)]
pub struct ResolveBody {
    pub key: String,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub context: Option<CapabilityContext>,
}

/// POST /api/v1/capabilities/resolve
pub async fn resolve_capability(State(state): State<ApiState>, Json(body): Json<ResolveBody>) -> impl IntoResponse {
    debug!(capability = %body.key, "resolve requested");
    match state
        .resolver
        .resolve(&body.key, &body.parameters, body.context.as_ref())
    {
        Ok(value) => ApiResponse::ok(value).into_response(),
        Err(e) => capability_error_response(&e),
    }
}

/// Batch resolution request body.
#[derive(Debug, Deserialize)]
pub struct ResolveManyBody {
    pub requests: Vec<ResolveRequest>,
    #[serde(default)]
    pub context: Option<CapabilityContext>,
}

/// POST /api/v1/capabilities/resolve-many
pub async fn resolve_many(State(state): State<ApiState>, Json(body): Json<ResolveManyBody>) -> impl IntoResponse {
    debug!(requests = body.requests.len(), "batch resolve requested");
    match state.resolver.resolve_many(&body.requests, body.context.as_ref()) {
        Ok(values) => ApiResponse::ok(values).into_response(),
        Err(e) => capability_error_response(&e),
    }
}

// ── Templates ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    pub slot: Option<String>,
}

/// GET /api/v1/templates
pub async fn list_templates(State(state): State<ApiState>, Query(query): Query<TemplateQuery>) -> impl IntoResponse {
    let templates: Vec<_> = match &query.slot {
        Some(slot) => state.templates.for_slot(slot).collect(),
        None => state.templates.all().collect(),
    };
    ApiResponse::ok(templates).into_response()
}

/// GET /api/v1/templates/{key}
pub async fn get_template(State(state): State<ApiState>, Path(key): Path<String>) -> impl IntoResponse {
    match state.templates.require(&key) {
        Ok(template) => ApiResponse::ok(template).into_response(),
        Err(e) => template_error_response(&e),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RulesQuery {
    pub root: Option<String>,
}

/// GET /api/v1/templates/{key}/rules
pub async fn template_rules(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Query(query): Query<RulesQuery>,
) -> impl IntoResponse {
    let template = match state.templates.require(&key) {
        Ok(template) => template,
        Err(e) => return template_error_response(&e),
    };
    let root = query.root.as_deref().unwrap_or("data");
    let rules = TemplateValidationService::new().build_rules_for_definition(template, root);
    ApiResponse::ok(rules).into_response()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::to_bytes;
    use folio_capability::{CapabilityCatalog, CapabilityParameterValidator, CapabilityResolver};
    use folio_core::PageSection;
    use folio_modules::ContentLibrary;
    use folio_modules::content::{Project, Skill};
    use serde_json::{Value, json};

    use crate::SectionStore;

    fn project(id: u64, title: &str, featured: bool) -> Project {
        Project {
            id,
            title: title.to_string(),
            slug: title.to_lowercase(),
            summary: String::new(),
            tags: vec![],
            url: None,
            is_visible: true,
            featured,
            position: id as i64,
        }
    }

    pub(crate) fn test_state(sections: Vec<PageSection>) -> ApiState {
        let library = ContentLibrary {
            projects: vec![project(1, "Folio", true), project(2, "Atlas", false)],
            skills: vec![Skill {
                name: "Rust".into(),
                category: "Languages".into(),
                level: Some(5),
            }],
            ..Default::default()
        };
        let mut catalog = CapabilityCatalog::new();
        folio_modules::install_all(&mut catalog, Arc::new(library)).unwrap();
        let resolver = CapabilityResolver::new(Arc::new(catalog), CapabilityParameterValidator::default());
        let templates = folio_modules::builtin_template_registry().unwrap();
        ApiState::new(resolver, templates, SectionStore::from_sections(sections))
    }

    pub(crate) async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn params(value: Value) -> Parameters {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn lists_only_public_capabilities() {
        let resp = list_capabilities(State(test_state(vec![]))).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        let keys: Vec<_> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["key"].as_str().unwrap().to_string())
            .collect();
        assert!(keys.contains(&"projects.visible.v1".to_string()));
        assert!(!keys.contains(&"courses.completed.v1".to_string()));
    }

    #[tokio::test]
    async fn unknown_capability_is_404() {
        let resp = get_capability(State(test_state(vec![])), Path("nope.v1".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_public_capability_is_hidden() {
        let state = test_state(vec![]);
        let resp = get_capability(State(state.clone()), Path("courses.completed.v1".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = get_capability(State(state), Path("projects.visible.v1".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["data"]["key"], json!("projects.visible.v1"));
    }

    #[tokio::test]
    async fn resolve_returns_payload() {
        let body = ResolveBody {
            key: "projects.visible.v1".to_string(),
            parameters: params(json!({"featured_only": true})),
            context: None,
        };
        let resp = resolve_capability(State(test_state(vec![])), Json(body))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["title"], json!("Folio"));
    }

    #[tokio::test]
    async fn type_mismatch_is_422_with_field_errors() {
        let body = ResolveBody {
            key: "projects.visible.v1".to_string(),
            parameters: params(json!({"limit": "six"})),
            context: None,
        };
        let resp = resolve_capability(State(test_state(vec![])), Json(body))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["errors"]["limit"].is_array());
    }

    #[tokio::test]
    async fn resolve_many_fails_fast() {
        let body = ResolveManyBody {
            requests: vec![
                ResolveRequest::new("skills.grouped.v1", Parameters::new()),
                ResolveRequest::new("missing.v1", Parameters::new()),
            ],
            context: None,
        };
        let resp = resolve_many(State(test_state(vec![])), Json(body)).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(resp).await;
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn resolve_many_aligns_results() {
        let body = ResolveManyBody {
            requests: vec![
                ResolveRequest::new("skills.grouped.v1", Parameters::new()),
                ResolveRequest::new("projects.visible.v1", params(json!({"limit": 1}))),
            ],
            context: None,
        };
        let resp = resolve_many(State(test_state(vec![])), Json(body)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["data"][0], json!({"Languages": ["Rust"]}));
        assert_eq!(body["data"][1].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn templates_filter_by_slot() {
        let query = TemplateQuery {
            slot: Some("footer".to_string()),
        };
        let resp = list_templates(State(test_state(vec![])), Query(query)).await.into_response();
        let body = body_json(resp).await;
        let keys: Vec<_> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["key"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["link_list".to_string()]);
    }

    #[tokio::test]
    async fn rules_use_default_root() {
        let resp = template_rules(
            State(test_state(vec![])),
            Path("link_list".to_string()),
            Query(RulesQuery::default()),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["data"]["data.links"], json!(["nullable"]));
        assert_eq!(body["data"]["data.links.*.url"], json!(["required", "string", "url"]));
    }

    #[tokio::test]
    async fn rules_for_unknown_template_is_404() {
        let resp = template_rules(
            State(test_state(vec![])),
            Path("missing".to_string()),
            Query(RulesQuery::default()),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

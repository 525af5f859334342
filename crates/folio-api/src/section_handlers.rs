//! Page section handlers: listing, composed fields, and reordering.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use folio_capability::CapabilityContext;
use folio_core::{PageId, SectionData, SectionId};
use folio_ordering::{ReorderClient, ReorderRequest};
use folio_template::{SectionComposer, SectionFieldResolver};

use crate::ApiState;
use crate::handlers::{ApiResponse, error_response, template_error_response, validation_response};

/// Render filters for section listings. Without them every section is
/// returned, which is what the editor needs.
#[derive(Debug, Default, Deserialize)]
pub struct SectionQuery {
    /// Unix seconds; keeps active sections whose window contains it.
    pub visible_at: Option<u64>,
    /// Keeps sections for this locale plus locale-neutral ones.
    pub locale: Option<String>,
}

/// GET /api/v1/pages/{page_id}/sections
pub async fn list_sections(
    State(state): State<ApiState>,
    Path(page_id): Path<PageId>,
    Query(query): Query<SectionQuery>,
) -> impl IntoResponse {
    let Some(sections) = state.sections.list(page_id).await else {
        return error_response("page not found", StatusCode::NOT_FOUND);
    };
    let sections: Vec<_> = sections
        .into_iter()
        .filter(|s| query.visible_at.is_none_or(|now| s.is_visible_at(now)))
        .filter(|s| query.locale.as_deref().is_none_or(|locale| s.matches_locale(locale)))
        .collect();
    ApiResponse::ok(sections).into_response()
}

/// A section with its fields resolved for rendering.
#[derive(Debug, Serialize)]
pub struct SectionView {
    pub id: SectionId,
    pub template_key: String,
    pub slot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    pub fields: SectionData,
}

/// GET /api/v1/pages/{page_id}/sections/{id}/fields
pub async fn section_fields(
    State(state): State<ApiState>,
    Path((page_id, id)): Path<(PageId, SectionId)>,
) -> impl IntoResponse {
    let Some(section) = state.sections.get(page_id, id).await else {
        return error_response("section not found", StatusCode::NOT_FOUND);
    };
    let template = match state.templates.require(&section.template_key) {
        Ok(template) => template,
        Err(e) => return template_error_response(&e),
    };

    let context = section
        .locale
        .as_deref()
        .map(|locale| CapabilityContext::new().with("locale", locale));
    let composed = match SectionComposer::new(&state.resolver).compose(template, &section.data, context.as_ref()) {
        Ok(composed) => composed,
        Err(e) => return template_error_response(&e),
    };

    let mut fields = SectionFieldResolver::new(Some(&composed), Some(template)).resolve_all();
    if let Some(source) = &template.data_source {
        if let Some(payload) = composed.get(&source.target) {
            fields.insert(source.target.clone(), payload.clone());
        }
    }

    debug!(page_id, section = id, template = %template.key, "section fields resolved");
    ApiResponse::ok(SectionView {
        id: section.id,
        template_key: section.template_key,
        slot: section.slot,
        anchor: section.anchor,
        fields,
    })
    .into_response()
}

/// Reorder request body: every section id of the page, in display order.
#[derive(Debug, Deserialize)]
pub struct ReorderBody {
    pub sections: Vec<SectionId>,
}

/// POST /api/v1/pages/{page_id}/sections/reorder
pub async fn reorder_sections(
    State(state): State<ApiState>,
    Path(page_id): Path<PageId>,
    Json(body): Json<ReorderBody>,
) -> impl IntoResponse {
    if !state.sections.has_page(page_id).await {
        return error_response("page not found", StatusCode::NOT_FOUND);
    }

    let request = ReorderRequest {
        page_id,
        sections: body.sections,
    };
    match state.sections.reorder(&request).await {
        Ok(()) => {
            info!(page_id, sections = request.sections.len(), "reorder accepted");
            ApiResponse::ok(request.sections).into_response()
        }
        Err(rejection) => validation_response(&rejection.message(), rejection.errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use folio_core::{PageSection, ordered_ids};
    use serde_json::json;

    use crate::handlers::tests::{body_json, test_state};

    fn sections() -> Vec<PageSection> {
        let data = |value: serde_json::Value| value.as_object().cloned().unwrap();
        vec![
            PageSection::new(1, 1, "hero", "header", 0).with_data(data(json!({"title": "  ", "subtitle": 42}))),
            PageSection::new(2, 1, "projects_grid", "main", 1).with_data(data(json!({"limit": "1", "heading": ""}))),
            PageSection::new(3, 1, "unknown_template", "main", 2),
        ]
    }

    #[tokio::test]
    async fn lists_sections_in_order() {
        let resp = list_sections(State(test_state(sections())), Path(1), Query(SectionQuery::default())).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        let ids: Vec<_> = body["data"].as_array().unwrap().iter().map(|s| s["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn render_filters_apply_visibility_and_locale() {
        let mut hidden = PageSection::new(4, 1, "rich_text", "main", 3);
        hidden.is_active = false;
        let mut scheduled = PageSection::new(5, 1, "rich_text", "main", 4);
        scheduled.visible_from = Some(1_000);
        scheduled.visible_until = Some(2_000);
        let mut french = PageSection::new(6, 1, "rich_text", "main", 5);
        french.locale = Some("fr".to_string());
        let mut all = sections();
        all.extend([hidden, scheduled, french]);
        let state = test_state(all);

        let ids = |body: serde_json::Value| -> Vec<u64> {
            body["data"].as_array().unwrap().iter().map(|s| s["id"].as_u64().unwrap()).collect()
        };

        let query = SectionQuery {
            visible_at: Some(1_500),
            locale: Some("en".to_string()),
        };
        let resp = list_sections(State(state.clone()), Path(1), Query(query)).await.into_response();
        assert_eq!(ids(body_json(resp).await), vec![1, 2, 3, 5]);

        let query = SectionQuery {
            visible_at: Some(2_001),
            locale: Some("fr".to_string()),
        };
        let resp = list_sections(State(state.clone()), Path(1), Query(query)).await.into_response();
        assert_eq!(ids(body_json(resp).await), vec![1, 2, 3, 6]);

        let resp = list_sections(State(state), Path(1), Query(SectionQuery::default()))
            .await
            .into_response();
        assert_eq!(ids(body_json(resp).await), vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn missing_page_is_404() {
        let resp = list_sections(State(test_state(sections())), Path(99), Query(SectionQuery::default())).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn hero_fields_fall_back_to_defaults() {
        let resp = section_fields(State(test_state(sections())), Path((1, 1))).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["data"]["fields"]["title"], json!("Welcome"));
        assert_eq!(body["data"]["fields"]["subtitle"], json!("42"));

        let keys: Vec<_> = body["data"]["fields"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["title", "subtitle", "cta_label", "cta_url", "background"]);
    }

    #[tokio::test]
    async fn projects_grid_fields_include_payload() {
        let resp = section_fields(State(test_state(sections())), Path((1, 2))).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        let fields = &body["data"]["fields"];
        assert_eq!(fields["heading"], json!("Projects"));
        assert_eq!(fields["limit"], json!(1));
        assert_eq!(fields["projects"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_template_is_404() {
        let resp = section_fields(State(test_state(sections())), Path((1, 3))).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reorder_persists_full_order() {
        let state = test_state(sections());
        let body = ReorderBody { sections: vec![3, 1, 2] };
        let resp = reorder_sections(State(state.clone()), Path(1), Json(body)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        assert_eq!(ordered_ids(&state.sections.list(1).await.unwrap()), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn partial_reorder_is_422() {
        let state = test_state(sections());
        let body = ReorderBody { sections: vec![3, 1] };
        let resp = reorder_sections(State(state.clone()), Path(1), Json(body)).await.into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(resp).await;
        assert!(body["errors"]["sections"].is_array());
        assert_eq!(ordered_ids(&state.sections.list(1).await.unwrap()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn reorder_unknown_page_is_404() {
        let body = ReorderBody { sections: vec![1] };
        let resp = reorder_sections(State(test_state(sections())), Path(7), Json(body))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

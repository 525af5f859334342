//! Capability modules over the content library.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use folio_capability::{
    CapabilityCatalog, CapabilityContext, CapabilityDefinition, CapabilityModule, ParamType,
    ParameterSpec, Parameters, ProviderError, ValidationError,
};

use crate::content::ContentLibrary;

/// Every portfolio module, in installation order.
pub fn all(library: Arc<ContentLibrary>) -> Vec<Box<dyn CapabilityModule>> {
    vec![
        Box::new(PagesModule(library.clone())),
        Box::new(ProjectsModule(library.clone())),
        Box::new(ExperiencesModule(library.clone())),
        Box::new(SkillsModule(library.clone())),
        Box::new(CoursesModule(library)),
    ]
}

fn payload<T: Serialize>(value: &T) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(value).context("serializing capability payload")?)
}

/// Optional positive `limit` parameter.
fn limit(params: &Parameters) -> Result<Option<usize>, ProviderError> {
    match params.get("limit").and_then(Value::as_i64) {
        None => Ok(None),
        Some(n) if n >= 1 => Ok(Some(n as usize)),
        Some(n) => Err(ValidationError::InvalidParameter {
            parameter: "limit".to_string(),
            message: format!("must be at least 1, got {n}"),
        }
        .into()),
    }
}

fn truncate<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

// ── Pages ──────────────────────────────────────────────────────

pub struct PagesModule(pub Arc<ContentLibrary>);

impl CapabilityModule for PagesModule {
    fn name(&self) -> &str {
        "pages"
    }

    fn register(&self, catalog: &mut CapabilityCatalog) -> Result<(), ValidationError> {
        let library = self.0.clone();
        catalog.register(
            CapabilityDefinition::new("pages.navigation.v1", "Pages shown in the site navigation")
                .parameter("locale", ParameterSpec::optional(ParamType::String))
                .returns("list<{slug, title}>")
                .public(true),
            Arc::new(
                move |params: &Parameters, ctx: Option<&CapabilityContext>| -> Result<Value, ProviderError> {
                    let locale = params
                        .get("locale")
                        .and_then(Value::as_str)
                        .or_else(|| ctx.and_then(CapabilityContext::locale));
                    let mut pages: Vec<_> = library
                        .pages
                        .iter()
                        .filter(|p| p.in_navigation)
                        .filter(|p| match (locale, p.locale.as_deref()) {
                            (Some(wanted), Some(page)) => wanted == page,
                            _ => true,
                        })
                        .collect();
                    pages.sort_by_key(|p| (p.position, p.id));
                    debug!(capability = "pages.navigation.v1", locale = ?locale, pages = pages.len(), "navigation built");
                    let items: Vec<_> = pages
                        .into_iter()
                        .map(|p| serde_json::json!({"slug": p.slug, "title": p.title}))
                        .collect();
                    Ok(Value::Array(items))
                },
            ),
        )
    }
}

// ── Projects ───────────────────────────────────────────────────

pub struct ProjectsModule(pub Arc<ContentLibrary>);

impl CapabilityModule for ProjectsModule {
    fn name(&self) -> &str {
        "projects"
    }

    fn register(&self, catalog: &mut CapabilityCatalog) -> Result<(), ValidationError> {
        let library = self.0.clone();
        catalog.register(
            CapabilityDefinition::new("projects.visible.v1", "Visible projects in display order")
                .parameter("limit", ParameterSpec::optional(ParamType::Integer).with_default(6))
                .parameter(
                    "featured_only",
                    ParameterSpec::optional(ParamType::Boolean).with_default(false),
                )
                .parameter("tag", ParameterSpec::optional(ParamType::String))
                .returns("list<project>")
                .public(true),
            Arc::new(
                move |params: &Parameters, _: Option<&CapabilityContext>| -> Result<Value, ProviderError> {
                    let limit = limit(params)?;
                    let featured_only = params
                        .get("featured_only")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    let tag = params.get("tag").and_then(Value::as_str);

                    let mut projects: Vec<_> = library
                        .projects
                        .iter()
                        .filter(|p| p.is_visible)
                        .filter(|p| !featured_only || p.featured)
                        .filter(|p| tag.is_none_or(|t| p.tags.iter().any(|pt| pt == t)))
                        .collect();
                    projects.sort_by_key(|p| (p.position, p.id));
                    let projects = truncate(projects, limit);
                    debug!(capability = "projects.visible.v1", featured_only, projects = projects.len(), "projects selected");
                    payload(&projects)
                },
            ),
        )
    }
}

// ── Experiences ────────────────────────────────────────────────

pub struct ExperiencesModule(pub Arc<ContentLibrary>);

impl CapabilityModule for ExperiencesModule {
    fn name(&self) -> &str {
        "experiences"
    }

    fn register(&self, catalog: &mut CapabilityCatalog) -> Result<(), ValidationError> {
        let library = self.0.clone();
        catalog.register(
            CapabilityDefinition::new("experiences.timeline.v1", "Experiences, most recent first")
                .parameter("limit", ParameterSpec::optional(ParamType::Integer))
                .returns("list<experience>")
                .public(true),
            Arc::new(
                move |params: &Parameters, _: Option<&CapabilityContext>| -> Result<Value, ProviderError> {
                    let limit = limit(params)?;
                    let mut experiences: Vec<_> = library.experiences.iter().collect();
                    experiences.sort_by(|a, b| b.started_on.cmp(&a.started_on).then(a.id.cmp(&b.id)));
                    let experiences = truncate(experiences, limit);
                    debug!(capability = "experiences.timeline.v1", experiences = experiences.len(), "timeline built");
                    payload(&experiences)
                },
            ),
        )
    }
}

// ── Skills ─────────────────────────────────────────────────────

pub struct SkillsModule(pub Arc<ContentLibrary>);

impl CapabilityModule for SkillsModule {
    fn name(&self) -> &str {
        "skills"
    }

    fn register(&self, catalog: &mut CapabilityCatalog) -> Result<(), ValidationError> {
        let library = self.0.clone();
        catalog.register(
            CapabilityDefinition::new("skills.grouped.v1", "Skill names grouped by category")
                .parameter("category", ParameterSpec::optional(ParamType::String))
                .returns("map<category, list<string>>")
                .public(true),
            Arc::new(
                move |params: &Parameters, _: Option<&CapabilityContext>| -> Result<Value, ProviderError> {
                    let category = params.get("category").and_then(Value::as_str);
                    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
                    for skill in &library.skills {
                        if category.is_some_and(|c| c != skill.category) {
                            continue;
                        }
                        groups.entry(&skill.category).or_default().push(&skill.name);
                    }
                    debug!(capability = "skills.grouped.v1", categories = groups.len(), "skills grouped");
                    payload(&groups)
                },
            ),
        )
    }
}

// ── Courses ────────────────────────────────────────────────────

pub struct CoursesModule(pub Arc<ContentLibrary>);

impl CapabilityModule for CoursesModule {
    fn name(&self) -> &str {
        "courses"
    }

    fn register(&self, catalog: &mut CapabilityCatalog) -> Result<(), ValidationError> {
        let library = self.0.clone();
        catalog.register(
            CapabilityDefinition::new("courses.completed.v1", "Completed courses, newest first")
                .parameter("limit", ParameterSpec::optional(ParamType::Integer))
                .parameter("year", ParameterSpec::optional(ParamType::Integer))
                .returns("list<course>")
                .public(false),
            Arc::new(
                move |params: &Parameters, _: Option<&CapabilityContext>| -> Result<Value, ProviderError> {
                    let limit = limit(params)?;
                    let year = params.get("year").and_then(Value::as_i64);
                    let mut courses: Vec<_> = library
                        .courses
                        .iter()
                        .filter(|c| c.completed)
                        .filter(|c| year.is_none_or(|y| c.year == Some(y)))
                        .collect();
                    courses.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.title.cmp(&b.title)));
                    let courses = truncate(courses, limit);
                    debug!(capability = "courses.completed.v1", courses = courses.len(), "courses selected");
                    payload(&courses)
                },
            ),
        )
    }
}

//! Built-in section templates.

use std::collections::BTreeMap;

use serde_json::Map;

use folio_template::{DataSource, FieldType, TemplateDefinition, TemplateField};

/// Data source that binds each listed parameter to the section field of the
/// same name.
fn source(capability: &str, bound: &[&str], target: &str) -> DataSource {
    DataSource {
        capability: capability.to_string(),
        parameters: Map::new(),
        bindings: bound
            .iter()
            .map(|name| (name.to_string(), name.to_string()))
            .collect::<BTreeMap<_, _>>(),
        target: target.to_string(),
    }
}

fn heading(default: &str) -> TemplateField {
    TemplateField::new("heading", "Heading", FieldType::String)
        .default_value(default)
        .rules(&["max:120"])
}

pub fn builtin_templates() -> Vec<TemplateDefinition> {
    vec![
        TemplateDefinition::new("hero", "Hero banner")
            .description("Large title block at the top of a page")
            .slots(&["header", "main"])
            .origin("core")
            .template_name("sections/hero")
            .field(
                TemplateField::new("title", "Title", FieldType::String)
                    .required()
                    .default_value("Welcome")
                    .rules(&["max:120"]),
            )
            .field(TemplateField::new("subtitle", "Subtitle", FieldType::Text))
            .field(TemplateField::new("cta_label", "Button label", FieldType::String))
            .field(TemplateField::new("cta_url", "Button link", FieldType::String).rules(&["url"]))
            .field(TemplateField::new("background", "Background", FieldType::Image)),
        TemplateDefinition::new("rich_text", "Rich text")
            .slots(&["main", "sidebar"])
            .origin("core")
            .template_name("sections/rich-text")
            .field(TemplateField::new("heading", "Heading", FieldType::String).rules(&["max:120"]))
            .field(TemplateField::new("body", "Body", FieldType::RichText).required()),
        TemplateDefinition::new("gallery", "Image gallery")
            .slots(&["main"])
            .origin("core")
            .template_name("sections/gallery")
            .field(heading("Gallery"))
            .field(TemplateField::new("images", "Images", FieldType::ImageGallery).required())
            .field(
                TemplateField::new("columns", "Columns", FieldType::Integer)
                    .default_value(3)
                    .rules(&["min:1", "max:6"]),
            ),
        TemplateDefinition::new("link_list", "Link list")
            .slots(&["footer", "sidebar"])
            .origin("core")
            .template_name("sections/link-list")
            .field(TemplateField::new("heading", "Heading", FieldType::String))
            .field(
                TemplateField::new("links", "Links", FieldType::Collection).items(vec![
                    TemplateField::new("label", "Label", FieldType::String).required(),
                    TemplateField::new("url", "URL", FieldType::String)
                        .required()
                        .rules(&["url"]),
                    TemplateField::new("external", "Open in new tab", FieldType::Boolean)
                        .default_value(false),
                ]),
            ),
        TemplateDefinition::new("projects_grid", "Projects grid")
            .slots(&["main"])
            .origin("projects")
            .template_name("sections/projects-grid")
            .field(heading("Projects"))
            .field(
                TemplateField::new("limit", "Number of projects", FieldType::Integer)
                    .default_value(6)
                    .rules(&["min:1", "max:24"]),
            )
            .field(
                TemplateField::new("featured_only", "Featured only", FieldType::Boolean)
                    .default_value(false),
            )
            .field(TemplateField::new("tag", "Tag filter", FieldType::String))
            .data_source(source(
                "projects.visible.v1",
                &["limit", "featured_only", "tag"],
                "projects",
            )),
        TemplateDefinition::new("experience_timeline", "Experience timeline")
            .slots(&["main"])
            .origin("experiences")
            .template_name("sections/experience-timeline")
            .field(heading("Experience"))
            .field(TemplateField::new("limit", "Number of entries", FieldType::Integer).rules(&["min:1"]))
            .data_source(source("experiences.timeline.v1", &["limit"], "experiences")),
        TemplateDefinition::new("skills_cloud", "Skills")
            .slots(&["main", "sidebar"])
            .origin("skills")
            .template_name("sections/skills-cloud")
            .field(heading("Skills"))
            .field(TemplateField::new("category", "Category", FieldType::String))
            .data_source(source("skills.grouped.v1", &["category"], "skills")),
        TemplateDefinition::new("courses_list", "Courses")
            .slots(&["main"])
            .origin("courses")
            .template_name("sections/courses-list")
            .field(heading("Courses"))
            .field(TemplateField::new("limit", "Number of courses", FieldType::Integer).rules(&["min:1"]))
            .field(TemplateField::new("year", "Year", FieldType::Integer))
            .data_source(source("courses.completed.v1", &["limit", "year"], "courses")),
    ]
}

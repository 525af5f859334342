//! Read-only introspection commands.

use std::sync::Arc;

use anyhow::Context;

use folio_capability::{CapabilityContext, CapabilityDefinition, CapabilityRegistry, Parameters};
use folio_core::FolioConfig;
use folio_template::{TemplateDefinition, TemplateValidationService};

use super::{build_resolver, load_library};

pub fn capabilities(config: &FolioConfig, all: bool, format: &str) -> anyhow::Result<()> {
    let resolver = build_resolver(config, Arc::new(load_library(config)?))?;
    let registry = resolver.registry();
    let definitions = if all {
        registry.all_definitions()
    } else {
        registry.public_definitions()
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&definitions)?),
        _ => {
            for definition in definitions {
                println!("{}", format_definition(definition));
            }
        }
    }
    Ok(())
}

fn format_definition(definition: &CapabilityDefinition) -> String {
    let mut out = format!("{}  {}", definition.key, definition.description);
    for (name, spec) in &definition.parameters {
        let presence = if spec.required { "required" } else { "optional" };
        out.push_str(&format!("\n    {name}: {} ({presence})", spec.param_type.as_str()));
        if let Some(default) = &spec.default {
            out.push_str(&format!(" = {default}"));
        }
    }
    if !definition.returns.is_empty() {
        out.push_str(&format!("\n    -> {}", definition.returns));
    }
    out
}

pub fn resolve(config: &FolioConfig, key: &str, params: &str, locale: Option<&str>) -> anyhow::Result<()> {
    let parameters: Parameters = serde_json::from_str(params).context("--params must be a JSON object")?;
    let locale = locale.unwrap_or(&config.site.default_locale);
    let context = CapabilityContext::new().with("locale", locale);

    let resolver = build_resolver(config, Arc::new(load_library(config)?))?;
    let value = resolver.resolve(key, &parameters, Some(&context))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn templates(slot: Option<&str>, format: &str) -> anyhow::Result<()> {
    let registry = folio_modules::builtin_template_registry()?;
    let templates: Vec<&TemplateDefinition> = match slot {
        Some(slot) => registry.for_slot(slot).collect(),
        None => registry.all().collect(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&templates)?),
        _ => {
            for template in templates {
                let slots: Vec<&str> = template.allowed_slots.iter().map(String::as_str).collect();
                println!("{}  {}  [{}]", template.key, template.label, slots.join(", "));
                if let Some(source) = &template.data_source {
                    println!("    data: {} -> {}", source.capability, source.target);
                }
            }
        }
    }
    Ok(())
}

pub fn rules(template: &str, root: &str) -> anyhow::Result<()> {
    let registry = folio_modules::builtin_template_registry()?;
    let definition = registry.require(template)?;
    let rules = TemplateValidationService::new().build_rules_for_definition(definition, root);
    println!("{}", serde_json::to_string_pretty(&rules)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_capability::{ParamType, ParameterSpec};

    #[test]
    fn definition_text_lists_parameters() {
        let definition = CapabilityDefinition::new("projects.visible.v1", "Visible projects")
            .parameter("limit", ParameterSpec::optional(ParamType::Integer).with_default(6))
            .returns("list<project>");

        let text = format_definition(&definition);
        assert!(text.starts_with("projects.visible.v1  Visible projects"));
        assert!(text.contains("limit: integer (optional) = 6"));
        assert!(text.ends_with("-> list<project>"));
    }

    #[test]
    fn rules_for_unknown_template_fail() {
        assert!(rules("missing", "data").is_err());
    }
}

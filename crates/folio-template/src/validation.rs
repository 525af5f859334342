//! Validation rules and default-filled payloads derived from a template.
//!
//! The rule lists are plain tokens (`"required"`, `"max:255"`) consumed by
//! the HTTP request validation layer; nothing here evaluates them.

use std::collections::BTreeMap;

use serde_json::Value;

use folio_core::SectionData;

use crate::definition::TemplateDefinition;
use crate::field::TemplateField;

/// Dotted field path → ordered rule tokens.
pub type RuleMap = BTreeMap<String, Vec<String>>;

/// Rule names that already say whether a value must be present.
const PRESENCE_RULES: &[&str] = &["required", "nullable", "sometimes"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateValidationService;

impl TemplateValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Rules for every field of `definition`, keyed `"{data_root}.{field}"`.
    ///
    /// Inferred presence and type rules come first, followed by the field's
    /// explicit rules in declaration order. Collection item fields are keyed
    /// `"{data_root}.{field}.*.{item}"`.
    pub fn build_rules_for_definition(&self, definition: &TemplateDefinition, data_root: &str) -> RuleMap {
        let mut rules = RuleMap::new();
        collect_rules(&definition.fields, data_root, &mut rules);
        rules
    }

    /// Copy of `data` with every missing template field set to its default
    /// (`null` when the field declares none). Present values and keys unknown
    /// to the template are left as they are.
    pub fn normalize_data_for_definition(&self, definition: &TemplateDefinition, data: &SectionData) -> SectionData {
        let mut normalized = data.clone();
        for field in &definition.fields {
            if !normalized.contains_key(&field.name) {
                let default = field.default_value.clone().unwrap_or(Value::Null);
                normalized.insert(field.name.clone(), default);
            }
        }
        normalized
    }
}

fn collect_rules(fields: &[TemplateField], prefix: &str, out: &mut RuleMap) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };

        let rules = rules_for_field(field);
        if !rules.is_empty() {
            out.insert(path.clone(), rules);
        }

        if !field.item_fields.is_empty() {
            collect_rules(&field.item_fields, &format!("{path}.*"), out);
        }
    }
}

fn rules_for_field(field: &TemplateField) -> Vec<String> {
    let names: Vec<&str> = field.rule_names().collect();
    let mut rules = Vec::with_capacity(field.validation_rules.len() + 2);

    if !names.iter().any(|name| PRESENCE_RULES.contains(name)) {
        rules.push(if field.required { "required" } else { "nullable" }.to_string());
    }

    if let Some(base) = field.field_type.base_rule() {
        if !names.iter().any(|name| is_equivalent_rule(base, name)) {
            rules.push(base.to_string());
        }
    }

    rules.extend(field.validation_rules.iter().cloned());
    rules
}

fn is_equivalent_rule(base: &str, name: &str) -> bool {
    match base {
        "integer" => matches!(name, "integer" | "int"),
        "boolean" => matches!(name, "boolean" | "bool"),
        _ => base == name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use serde_json::json;

    fn rules(field: TemplateField) -> Vec<String> {
        let def = TemplateDefinition::new("t", "T").field(field);
        let mut map = TemplateValidationService::new().build_rules_for_definition(&def, "data");
        assert_eq!(map.len(), 1);
        map.pop_first().unwrap().1
    }

    #[test]
    fn required_string_without_explicit_rules() {
        let out = rules(TemplateField::new("title", "Title", FieldType::String).required());
        assert_eq!(out, vec!["required", "string"]);
    }

    #[test]
    fn optional_integer() {
        let out = rules(TemplateField::new("limit", "Limit", FieldType::Integer));
        assert_eq!(out, vec!["nullable", "integer"]);
    }

    #[test]
    fn explicit_rules_follow_inferred_ones() {
        let out = rules(
            TemplateField::new("title", "Title", FieldType::String)
                .required()
                .rules(&["max:120", "regex:/^[A-Z]/"]),
        );
        assert_eq!(out, vec!["required", "string", "max:120", "regex:/^[A-Z]/"]);
    }

    #[test]
    fn explicit_presence_suppresses_inference() {
        let out = rules(
            TemplateField::new("title", "Title", FieldType::String)
                .required()
                .rules(&["sometimes", "max:10"]),
        );
        assert_eq!(out, vec!["string", "sometimes", "max:10"]);
    }

    #[test]
    fn explicit_type_alias_suppresses_base_rule() {
        let out = rules(TemplateField::new("count", "Count", FieldType::Integer).rules(&["int", "min:0"]));
        assert_eq!(out, vec!["nullable", "int", "min:0"]);
        let out = rules(TemplateField::new("ids", "Ids", FieldType::ArrayInteger).rules(&["array"]));
        assert_eq!(out, vec!["nullable", "array"]);
    }

    #[test]
    fn untyped_kinds_get_presence_only() {
        let out = rules(TemplateField::new("body", "Body", FieldType::RichText));
        assert_eq!(out, vec!["nullable"]);
        let out = rules(TemplateField::new("cover", "Cover", FieldType::Image).required());
        assert_eq!(out, vec!["required"]);
    }

    #[test]
    fn collection_items_get_wildcard_paths() {
        let def = TemplateDefinition::new("links", "Links").field(
            TemplateField::new("items", "Items", FieldType::Collection).items(vec![
                TemplateField::new("label", "Label", FieldType::String).required(),
                TemplateField::new("external", "External", FieldType::Boolean),
            ]),
        );
        let map = TemplateValidationService::new().build_rules_for_definition(&def, "data");
        assert_eq!(map["data.items"], vec!["nullable"]);
        assert_eq!(map["data.items.*.label"], vec!["required", "string"]);
        assert_eq!(map["data.items.*.external"], vec!["nullable", "boolean"]);
    }

    #[test]
    fn empty_root_uses_bare_field_names() {
        let def = TemplateDefinition::new("t", "T")
            .field(TemplateField::new("title", "Title", FieldType::String));
        let map = TemplateValidationService::new().build_rules_for_definition(&def, "");
        assert!(map.contains_key("title"));
    }

    #[test]
    fn normalize_fills_missing_defaults() {
        let def = TemplateDefinition::new("t", "T")
            .field(TemplateField::new("x", "X", FieldType::String).default_value("d"));
        let service = TemplateValidationService::new();

        let empty = SectionData::new();
        assert_eq!(
            Value::Object(service.normalize_data_for_definition(&def, &empty)),
            json!({"x": "d"})
        );

        let given = json!({"x": "v"}).as_object().cloned().unwrap();
        assert_eq!(
            Value::Object(service.normalize_data_for_definition(&def, &given)),
            json!({"x": "v"})
        );
    }

    #[test]
    fn normalize_keeps_extra_keys_and_explicit_nulls() {
        let def = TemplateDefinition::new("t", "T")
            .field(TemplateField::new("x", "X", FieldType::String).default_value("d"))
            .field(TemplateField::new("y", "Y", FieldType::Integer));
        let data = json!({"x": null, "legacy": 1}).as_object().cloned().unwrap();

        let out = TemplateValidationService::new().normalize_data_for_definition(&def, &data);
        assert_eq!(Value::Object(out), json!({"x": null, "y": null, "legacy": 1}));
    }
}

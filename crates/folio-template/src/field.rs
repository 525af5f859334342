//! Template fields and the closed set of field types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive type of a template field.
///
/// Consumers (rule builder, value resolver, renderers) match on this
/// exhaustively, so a new kind is a compile-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Text,
    RichText,
    Integer,
    Boolean,
    ArrayInteger,
    Collection,
    Image,
    ImageGallery,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::RichText => "rich_text",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::ArrayInteger => "array_integer",
            FieldType::Collection => "collection",
            FieldType::Image => "image",
            FieldType::ImageGallery => "image_gallery",
        }
    }

    /// Implicit validation rule token for the type, if it has one.
    pub fn base_rule(&self) -> Option<&'static str> {
        match self {
            FieldType::String => Some("string"),
            FieldType::Integer => Some("integer"),
            FieldType::Boolean => Some("boolean"),
            FieldType::ArrayInteger => Some("array"),
            FieldType::Text
            | FieldType::RichText
            | FieldType::Collection
            | FieldType::Image
            | FieldType::ImageGallery => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a content schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<Value>,
    /// Explicit rule tokens, e.g. `"max:255"`, in declaration order.
    #[serde(default)]
    pub validation_rules: Vec<String>,
    /// Item schema for `collection` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_fields: Vec<TemplateField>,
}

impl TemplateField {
    pub fn new(name: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            default_value: None,
            validation_rules: Vec::new(),
            item_fields: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn rules(mut self, rules: &[&str]) -> Self {
        self.validation_rules = rules.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn items(mut self, item_fields: Vec<TemplateField>) -> Self {
        self.item_fields = item_fields;
        self
    }

    /// Explicit rule names, without their `:`-separated arguments.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.validation_rules.iter().map(|rule| rule_name(rule))
    }
}

/// Name part of a rule token: `max` for `max:255`.
pub fn rule_name(rule: &str) -> &str {
    rule.split_once(':').map_or(rule, |(name, _)| name).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_snake_case() {
        let field: TemplateField = serde_json::from_str(
            r#"{"name": "body", "label": "Body", "type": "rich_text", "required": true,
                "default_value": null, "validation_rules": ["max:5000"]}"#,
        )
        .unwrap();
        assert_eq!(field.field_type, FieldType::RichText);
        assert!(field.item_fields.is_empty());
        assert_eq!(serde_json::to_value(FieldType::ImageGallery).unwrap(), "image_gallery");
    }

    #[test]
    fn base_rules() {
        assert_eq!(FieldType::String.base_rule(), Some("string"));
        assert_eq!(FieldType::ArrayInteger.base_rule(), Some("array"));
        assert_eq!(FieldType::RichText.base_rule(), None);
        assert_eq!(FieldType::Image.base_rule(), None);
    }

    #[test]
    fn rule_names_strip_arguments() {
        let field = TemplateField::new("title", "Title", FieldType::String)
            .rules(&["max:255", "required_with:subtitle", "url"]);
        let names: Vec<_> = field.rule_names().collect();
        assert_eq!(names, vec!["max", "required_with", "url"]);
    }
}

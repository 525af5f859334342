//! Template definitions.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TemplateError, TemplateResult};
use crate::field::{FieldType, TemplateField};

/// Capability feeding a template's sections at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub capability: String,
    /// Fixed parameters passed on every resolution.
    #[serde(default)]
    pub parameters: serde_json::Map<String, Value>,
    /// Parameter name → section field whose value overrides it.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
    /// Section data key receiving the payload.
    pub target: String,
}

/// Full schema for a content block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub allowed_slots: BTreeSet<String>,
    /// Declaration order is rendering order.
    #[serde(default)]
    pub fields: Vec<TemplateField>,
    /// Module or namespace that contributed the template.
    #[serde(default)]
    pub origin: String,
    /// Name of the view that renders the template.
    #[serde(default)]
    pub template_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSource>,
}

impl TemplateDefinition {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: String::new(),
            allowed_slots: BTreeSet::new(),
            fields: Vec::new(),
            origin: String::new(),
            template_name: key.to_string(),
            data_source: None,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn slots(mut self, slots: &[&str]) -> Self {
        self.allowed_slots = slots.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn field(mut self, field: TemplateField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn origin(mut self, origin: &str) -> Self {
        self.origin = origin.to_string();
        self
    }

    pub fn template_name(mut self, name: &str) -> Self {
        self.template_name = name.to_string();
        self
    }

    pub fn data_source(mut self, source: DataSource) -> Self {
        self.data_source = Some(source);
        self
    }

    /// Look up a top-level field.
    pub fn get_field(&self, name: &str) -> Option<&TemplateField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn accepts_slot(&self, slot: &str) -> bool {
        self.allowed_slots.contains(slot)
    }

    /// Check structural invariants: non-blank key, unique field names at each
    /// level, item fields only on collections, no blank rule tokens.
    pub fn validate(&self) -> TemplateResult<()> {
        if self.key.trim().is_empty() {
            return Err(self.invalid("template key must not be empty"));
        }
        self.validate_fields(&self.fields, None)?;
        if let Some(source) = &self.data_source {
            if source.target.trim().is_empty() {
                return Err(self.invalid("data source target must not be empty"));
            }
        }
        Ok(())
    }

    fn validate_fields(&self, fields: &[TemplateField], parent: Option<&str>) -> TemplateResult<()> {
        let mut seen = HashSet::new();
        for field in fields {
            let path = match parent {
                Some(parent) => format!("{parent}.*.{}", field.name),
                None => field.name.clone(),
            };
            if field.name.trim().is_empty() {
                return Err(self.invalid(&format!("blank field name at `{path}`")));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(self.invalid(&format!("duplicate field `{path}`")));
            }
            if let Some(rule) = field.validation_rules.iter().find(|r| r.trim().is_empty()) {
                return Err(TemplateError::InvalidRule {
                    template: self.key.clone(),
                    field: path,
                    rule: rule.clone(),
                });
            }
            if !field.item_fields.is_empty() {
                if field.field_type != FieldType::Collection {
                    return Err(self.invalid(&format!(
                        "field `{path}` of type {} cannot declare item fields",
                        field.field_type
                    )));
                }
                self.validate_fields(&field.item_fields, Some(&path))?;
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> TemplateError {
        TemplateError::InvalidDefinition {
            template: self.key.clone(),
            reason: reason.to_string(),
        }
    }
}

//! Section field resolver: effective field values for rendering.
//!
//! Precedence for a field:
//!
//! 1. the persisted value, normalized to the field type, if usable
//! 2. the template default, normalized the same way, if usable
//! 3. no value
//!
//! "Usable" rules out `null` and blank strings only. Blank persisted strings
//! therefore fall through to the default, while `false` and `0` are returned
//! as they are.

use serde_json::Value;

use folio_core::SectionData;

use crate::definition::TemplateDefinition;
use crate::field::FieldType;

#[derive(Debug, Clone, Copy)]
pub struct SectionFieldResolver<'a> {
    data: Option<&'a SectionData>,
    template: Option<&'a TemplateDefinition>,
}

impl<'a> SectionFieldResolver<'a> {
    pub fn new(data: Option<&'a SectionData>, template: Option<&'a TemplateDefinition>) -> Self {
        Self { data, template }
    }

    /// Effective value of `field`. `expected` overrides the declared type.
    pub fn get_value(&self, field: &str, expected: Option<FieldType>) -> Option<Value> {
        let declared = self.template.and_then(|t| t.get_field(field));
        let field_type = expected.or(declared.map(|f| f.field_type));

        let persisted = self
            .data
            .and_then(|data| data.get(field))
            .filter(|v| !v.is_null())
            .and_then(|raw| normalize(field_type, raw))
            .filter(is_usable);
        if persisted.is_some() {
            return persisted;
        }

        declared
            .and_then(|f| f.default_value.as_ref())
            .filter(|v| !v.is_null())
            .and_then(|default| normalize(field_type, default))
            .filter(is_usable)
    }

    pub fn string(&self, field: &str) -> Option<String> {
        match self.get_value(field, Some(FieldType::String))? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        self.get_value(field, Some(FieldType::Integer))?.as_i64()
    }

    pub fn boolean(&self, field: &str) -> Option<bool> {
        self.get_value(field, Some(FieldType::Boolean))?.as_bool()
    }

    /// Integer list; empty when the field resolves to nothing.
    pub fn integers(&self, field: &str) -> Vec<i64> {
        match self.get_value(field, Some(FieldType::ArrayInteger)) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_i64).collect(),
            _ => Vec::new(),
        }
    }

    /// Every template field's effective value, in declaration order.
    /// Fields without a value map to `null`.
    pub fn resolve_all(&self) -> SectionData {
        let mut resolved = SectionData::new();
        if let Some(template) = self.template {
            for field in &template.fields {
                let value = self.get_value(&field.name, None).unwrap_or(Value::Null);
                resolved.insert(field.name.clone(), value);
            }
        }
        resolved
    }
}

fn is_usable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Coerce `value` to `field_type`; `None` when it cannot be represented.
/// Without a known type the value is returned unchanged.
pub fn normalize(field_type: Option<FieldType>, value: &Value) -> Option<Value> {
    let Some(field_type) = field_type else {
        return Some(value.clone());
    };
    match field_type {
        FieldType::String | FieldType::Text | FieldType::RichText => match value {
            Value::String(_) => Some(value.clone()),
            Value::Number(n) => Some(Value::String(n.to_string())),
            Value::Bool(b) => Some(Value::String(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        },
        FieldType::Integer => to_integer(value).map(Value::from),
        FieldType::Boolean => to_boolean(value).map(Value::Bool),
        FieldType::ArrayInteger => match value {
            Value::Array(items) => Some(Value::Array(
                items.iter().filter_map(to_integer).map(Value::from).collect(),
            )),
            _ => None,
        },
        FieldType::Collection => match value {
            Value::Array(items) => Some(Value::Array(
                items.iter().filter(|item| item.is_object()).cloned().collect(),
            )),
            _ => None,
        },
        FieldType::Image => match value {
            Value::String(_) | Value::Object(_) => Some(value.clone()),
            _ => None,
        },
        FieldType::ImageGallery => match value {
            Value::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .filter(|item| is_image_reference(item))
                    .cloned()
                    .collect(),
            )),
            _ => None,
        },
    }
}

fn is_image_reference(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Object(_) => true,
        _ => false,
    }
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" | "" => Some(false),
            _ => None,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

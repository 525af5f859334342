//! Capability definitions and their parameter schema.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::key::CapabilityKey;

/// Declared primitive type of a capability parameter.
///
/// Anything outside the known set is kept as [`ParamType::Other`] and is
/// accepted unconditionally by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
    Other(String),
}

impl ParamType {
    pub fn parse(declared: &str) -> Self {
        match declared {
            "string" => ParamType::String,
            "int" | "integer" => ParamType::Integer,
            "float" | "double" => ParamType::Float,
            "bool" | "boolean" => ParamType::Boolean,
            "array" => ParamType::Array,
            other => ParamType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Float => "float",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Other(name) => name,
        }
    }

    /// Whether `value` conforms to this type.
    ///
    /// Integers count as floats, and JSON objects count as arrays (maps are
    /// arrays on the wire the capability contract was designed for).
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Float => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Array => value.is_array() || value.is_object(),
            ParamType::Other(_) => true,
        }
    }
}

impl From<String> for ParamType {
    fn from(value: String) -> Self {
        ParamType::parse(&value)
    }
}

impl From<ParamType> for String {
    fn from(value: ParamType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema entry for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// A JSON `null` default is equivalent to no default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParameterSpec {
    pub fn required(param_type: ParamType) -> Self {
        Self {
            required: true,
            param_type,
            default: None,
        }
    }

    pub fn optional(param_type: ParamType) -> Self {
        Self {
            required: false,
            param_type,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        let default = default.into();
        self.default = (!default.is_null()).then_some(default);
        self
    }
}

/// Declared contract of a capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityDefinition {
    pub key: CapabilityKey,
    pub description: String,
    /// Parameter name → schema. Map keys are unique by construction.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterSpec>,
    /// Human-readable description of the payload shape.
    #[serde(default)]
    pub returns: String,
    #[serde(default)]
    pub public: bool,
}

impl CapabilityDefinition {
    pub fn new(key: impl Into<CapabilityKey>, description: &str) -> Self {
        Self {
            key: key.into(),
            description: description.to_string(),
            parameters: BTreeMap::new(),
            returns: String::new(),
            public: false,
        }
    }

    pub fn parameter(mut self, name: &str, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.to_string(), spec);
        self
    }

    pub fn returns(mut self, returns: &str) -> Self {
        self.returns = returns.to_string();
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Check the definition itself is well formed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.as_str().trim().is_empty() {
            return Err(ValidationError::InvalidSchema(
                "capability key must not be empty".to_string(),
            ));
        }
        if let Some(name) = self.parameters.keys().find(|name| name.trim().is_empty()) {
            return Err(ValidationError::InvalidSchema(format!(
                "capability {} declares a parameter with a blank name {name:?}",
                self.key
            )));
        }
        Ok(())
    }
}

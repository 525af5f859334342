//! Parameter validation and normalization against a definition's schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use folio_core::config::CapabilitiesConfig;

use crate::definition::CapabilityDefinition;
use crate::error::ValidationError;
use crate::provider::Parameters;

/// Validator switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Check supplied values against declared primitive types.
    pub strict_types: bool,
    /// Pass undeclared parameters through instead of rejecting them.
    pub allow_unknown_parameters: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            strict_types: true,
            allow_unknown_parameters: false,
        }
    }
}

impl From<CapabilitiesConfig> for ValidatorOptions {
    fn from(config: CapabilitiesConfig) -> Self {
        Self {
            strict_types: config.strict_types,
            allow_unknown_parameters: config.allow_unknown_parameters,
        }
    }
}

/// Validates a raw parameter map and fills schema defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityParameterValidator {
    options: ValidatorOptions,
}

impl CapabilityParameterValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Produce the normalized parameter map for `definition`.
    ///
    /// The output holds every schema key (supplied value, else default, else
    /// `null`) plus undeclared keys when those are allowed. An explicit
    /// `null` counts as not supplied.
    pub fn validate(
        &self,
        definition: &CapabilityDefinition,
        raw: &Parameters,
    ) -> Result<Parameters, ValidationError> {
        let mut normalized = Parameters::new();

        for (name, spec) in &definition.parameters {
            let supplied = raw.get(name).filter(|v| !v.is_null());
            let value = match (supplied, &spec.default) {
                (Some(value), _) => value.clone(),
                (None, Some(default)) => default.clone(),
                (None, None) if spec.required => {
                    return Err(ValidationError::MissingParameter {
                        capability: definition.key.clone(),
                        parameter: name.clone(),
                    });
                }
                (None, None) => Value::Null,
            };

            if self.options.strict_types && !value.is_null() && !spec.param_type.accepts(&value) {
                return Err(ValidationError::TypeMismatch {
                    capability: definition.key.clone(),
                    parameter: name.clone(),
                    expected: spec.param_type.to_string(),
                });
            }

            normalized.insert(name.clone(), value);
        }

        for (name, value) in raw {
            if definition.parameters.contains_key(name) {
                continue;
            }
            if !self.options.allow_unknown_parameters {
                return Err(ValidationError::UnknownParameter {
                    capability: definition.key.clone(),
                    parameter: name.clone(),
                });
            }
            trace!(capability = %definition.key, parameter = %name, "passing through undeclared parameter");
            normalized.insert(name.clone(), value.clone());
        }

        Ok(normalized)
    }
}

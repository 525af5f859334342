//! Template error types.

use thiserror::Error;

use folio_capability::CapabilityError;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {template}: {reason}")]
    InvalidDefinition { template: String, reason: String },

    #[error("template {template}: field `{field}` has an invalid rule {rule:?}")]
    InvalidRule {
        template: String,
        field: String,
        rule: String,
    },

    #[error("template not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

//! Error types for capability resolution.

use thiserror::Error;

use crate::key::CapabilityKey;

/// Result type alias for capability operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Errors surfaced by the resolver.
///
/// Validation and not-found errors are contract violations that callers
/// translate into responses; execution errors normalize arbitrary provider
/// failures into one shape.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("capability not found: {key}")]
    NotFound { key: CapabilityKey },

    #[error("capability {key} failed: {source}")]
    Execution {
        key: CapabilityKey,
        #[source]
        source: anyhow::Error,
    },
}

impl CapabilityError {
    /// The capability key the error refers to, when it carries one.
    pub fn key(&self) -> Option<&CapabilityKey> {
        match self {
            CapabilityError::NotFound { key } | CapabilityError::Execution { key, .. } => Some(key),
            CapabilityError::Validation(e) => e.capability(),
        }
    }
}

/// Parameter or schema validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required parameter `{parameter}` for capability {capability}")]
    MissingParameter {
        capability: CapabilityKey,
        parameter: String,
    },

    #[error("parameter `{parameter}` for capability {capability} must be of type {expected}")]
    TypeMismatch {
        capability: CapabilityKey,
        parameter: String,
        expected: String,
    },

    #[error("unknown parameter `{parameter}` for capability {capability}")]
    UnknownParameter {
        capability: CapabilityKey,
        parameter: String,
    },

    #[error("invalid parameter `{parameter}`: {message}")]
    InvalidParameter { parameter: String, message: String },

    #[error("invalid capability schema: {0}")]
    InvalidSchema(String),
}

impl ValidationError {
    pub fn capability(&self) -> Option<&CapabilityKey> {
        match self {
            ValidationError::MissingParameter { capability, .. }
            | ValidationError::TypeMismatch { capability, .. }
            | ValidationError::UnknownParameter { capability, .. } => Some(capability),
            ValidationError::InvalidParameter { .. } | ValidationError::InvalidSchema(_) => None,
        }
    }

    /// The offending parameter name, if the error concerns one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            ValidationError::MissingParameter { parameter, .. }
            | ValidationError::TypeMismatch { parameter, .. }
            | ValidationError::UnknownParameter { parameter, .. }
            | ValidationError::InvalidParameter { parameter, .. } => Some(parameter),
            ValidationError::InvalidSchema(_) => None,
        }
    }
}

//! Provider contract: the executable side of a capability.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::context::CapabilityContext;
use crate::definition::CapabilityDefinition;
use crate::error::ValidationError;

/// Normalized parameter map handed to providers.
pub type Parameters = Map<String, Value>;

/// Failure raised by a provider.
///
/// Validation failures pass through the resolver untouched; everything else
/// is wrapped into [`CapabilityError::Execution`](crate::CapabilityError).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Executable behavior backing a capability.
///
/// Providers are polymorphic over this single method. Closures with the
/// matching signature implement it directly.
pub trait CapabilityProvider: Send + Sync {
    fn execute(
        &self,
        parameters: &Parameters,
        context: Option<&CapabilityContext>,
    ) -> Result<Value, ProviderError>;
}

impl<F> CapabilityProvider for F
where
    F: Fn(&Parameters, Option<&CapabilityContext>) -> Result<Value, ProviderError> + Send + Sync,
{
    fn execute(
        &self,
        parameters: &Parameters,
        context: Option<&CapabilityContext>,
    ) -> Result<Value, ProviderError> {
        self(parameters, context)
    }
}

/// A definition paired with the provider that implements it.
#[derive(Clone)]
pub struct RegisteredCapability {
    pub definition: CapabilityDefinition,
    pub provider: Arc<dyn CapabilityProvider>,
}

impl RegisteredCapability {
    pub fn new(definition: CapabilityDefinition, provider: Arc<dyn CapabilityProvider>) -> Self {
        Self {
            definition,
            provider,
        }
    }
}

impl fmt::Debug for RegisteredCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCapability")
            .field("key", &self.definition.key)
            .finish_non_exhaustive()
    }
}

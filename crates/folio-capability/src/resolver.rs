//! Capability resolver: lookup, validation, and provider invocation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::CapabilityRegistry;
use crate::context::CapabilityContext;
use crate::error::{CapabilityError, CapabilityResult};
use crate::key::CapabilityKey;
use crate::provider::{Parameters, ProviderError};
use crate::validator::CapabilityParameterValidator;

/// One entry of a batch resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub key: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl ResolveRequest {
    pub fn new(key: &str, parameters: Parameters) -> Self {
        Self {
            key: key.to_string(),
            parameters,
        }
    }
}

/// Resolves capabilities against an explicitly injected registry.
#[derive(Clone)]
pub struct CapabilityResolver {
    registry: Arc<dyn CapabilityRegistry>,
    validator: CapabilityParameterValidator,
}

impl CapabilityResolver {
    pub fn new(registry: Arc<dyn CapabilityRegistry>, validator: CapabilityParameterValidator) -> Self {
        Self { registry, validator }
    }

    pub fn registry(&self) -> &dyn CapabilityRegistry {
        self.registry.as_ref()
    }

    /// Resolve a single capability.
    ///
    /// Fails with `NotFound` before any provider runs when the key lacks a
    /// definition or a provider. The provider receives the validator's
    /// normalized map, never the raw input.
    pub fn resolve(
        &self,
        key: &str,
        parameters: &Parameters,
        context: Option<&CapabilityContext>,
    ) -> CapabilityResult<Value> {
        let capability = self
            .registry
            .registered(key)
            .ok_or_else(|| CapabilityError::NotFound {
                key: CapabilityKey::new(key),
            })?;

        let normalized = self.validator.validate(&capability.definition, parameters)?;
        debug!(capability = %key, parameters = normalized.len(), "invoking provider");

        capability
            .provider
            .execute(&normalized, context)
            .map_err(|e| match e {
                ProviderError::Validation(e) => CapabilityError::Validation(e),
                ProviderError::Failed(source) => {
                    warn!(capability = %key, error = %source, "provider failed");
                    CapabilityError::Execution {
                        key: capability.definition.key.clone(),
                        source,
                    }
                }
            })
    }

    /// Resolve requests in order; results are aligned by request index.
    ///
    /// Fail-fast: the first failing request aborts the batch and results
    /// already computed are dropped.
    pub fn resolve_many(
        &self,
        requests: &[ResolveRequest],
        context: Option<&CapabilityContext>,
    ) -> CapabilityResult<Vec<Value>> {
        let mut results = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            let value = self
                .resolve(&request.key, &request.parameters, context)
                .inspect_err(|e| {
                    debug!(index, capability = %request.key, error = %e, "batch aborted");
                })?;
            results.push(value);
        }
        Ok(results)
    }
}

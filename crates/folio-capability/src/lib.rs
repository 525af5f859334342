//! folio-capability: plugin-style capability registry for Folio.
//!
//! Domain modules publish versioned, parameterized data providers
//! ("capabilities") into a [`CapabilityCatalog`] once at startup. At render
//! time the [`CapabilityResolver`] looks a capability up by key, validates
//! and normalizes the caller's parameters against the declared schema, and
//! invokes the provider.
//!
//! # Architecture
//!
//! ```text
//! CapabilityModule ──install──▶ CapabilityCatalog (key → definition, provider)
//!                                      │
//! caller ──resolve(key, params)──▶ CapabilityResolver
//!                                      ├── CapabilityParameterValidator
//!                                      └── CapabilityProvider::execute
//! ```
//!
//! The catalog is built once and passed explicitly; it is read-only after
//! boot and carries no internal synchronization.

pub mod catalog;
pub mod context;
pub mod definition;
pub mod error;
pub mod key;
pub mod provider;
pub mod resolver;
pub mod validator;

pub use catalog::{CapabilityCatalog, CapabilityModule, CapabilityRegistry};
pub use context::CapabilityContext;
pub use definition::{CapabilityDefinition, ParamType, ParameterSpec};
pub use error::{CapabilityError, CapabilityResult, ValidationError};
pub use key::CapabilityKey;
pub use provider::{CapabilityProvider, Parameters, ProviderError, RegisteredCapability};
pub use resolver::{CapabilityResolver, ResolveRequest};
pub use validator::{CapabilityParameterValidator, ValidatorOptions};

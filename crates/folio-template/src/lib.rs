//! folio-template: declarative content schema for Folio sections.
//!
//! A [`TemplateDefinition`] describes the fields a section of a given kind
//! may hold. From it this crate derives:
//!
//! - **`validation`**: presence/type rule lists and default-filled payloads
//!   for the HTTP validation layer
//! - **`resolver`**: the effective value of a field, reconciling persisted
//!   section data with template defaults
//! - **`compose`**: capability payloads merged into section data before
//!   rendering
//!
//! Templates are collected in a [`TemplateRegistry`] at startup.

pub mod compose;
pub mod definition;
pub mod error;
pub mod field;
pub mod registry;
pub mod resolver;
pub mod validation;

pub use compose::SectionComposer;
pub use definition::{DataSource, TemplateDefinition};
pub use error::{TemplateError, TemplateResult};
pub use field::{FieldType, TemplateField};
pub use registry::TemplateRegistry;
pub use resolver::SectionFieldResolver;
pub use validation::{RuleMap, TemplateValidationService};

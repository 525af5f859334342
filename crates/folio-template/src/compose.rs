//! Section composition: merge capability payloads into section data.

use tracing::debug;

use folio_capability::{CapabilityContext, CapabilityResolver, Parameters};
use folio_core::SectionData;

use crate::definition::TemplateDefinition;
use crate::error::TemplateResult;
use crate::resolver::SectionFieldResolver;

/// Resolves a template's data source and writes the payload into a copy of
/// the section data.
#[derive(Clone, Copy)]
pub struct SectionComposer<'a> {
    resolver: &'a CapabilityResolver,
}

impl<'a> SectionComposer<'a> {
    pub fn new(resolver: &'a CapabilityResolver) -> Self {
        Self { resolver }
    }

    /// Composed data for one section. Templates without a data source get an
    /// unchanged copy; capability failures propagate as they are.
    pub fn compose(
        &self,
        template: &TemplateDefinition,
        data: &SectionData,
        context: Option<&CapabilityContext>,
    ) -> TemplateResult<SectionData> {
        let mut composed = data.clone();
        let Some(source) = &template.data_source else {
            return Ok(composed);
        };

        let fields = SectionFieldResolver::new(Some(data), Some(template));
        let parameters = bind_parameters(&source.parameters, &source.bindings, &fields);
        let payload = self
            .resolver
            .resolve(&source.capability, &parameters, context)?;

        debug!(
            template = %template.key,
            capability = %source.capability,
            target = %source.target,
            "section data composed"
        );
        composed.insert(source.target.clone(), payload);
        Ok(composed)
    }
}

/// Fixed parameters overlaid with the effective value of each bound field.
/// Bound fields that resolve to nothing leave the fixed parameter in place.
fn bind_parameters<'b>(
    fixed: &Parameters,
    bindings: impl IntoIterator<Item = (&'b String, &'b String)>,
    fields: &SectionFieldResolver<'_>,
) -> Parameters {
    let mut parameters = fixed.clone();
    for (parameter, field) in bindings {
        if let Some(value) = fields.get_value(field, None) {
            parameters.insert(parameter.clone(), value);
        }
    }
    parameters
}

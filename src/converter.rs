/// Extraction of converter source and target types from a `typeof(...)` tag argument.
use crate::catalog::RuleId;
use crate::relation::find_generic_capability;
use crate::types::{BindingSite, CapabilityMatch, ConverterSpec, render_type_list};
use crate::validate::{Context, DiagnosticSink};

/// Outcome of looking for a converter on a binding tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConverterLookup {
    /// No `typeof` argument. Converters are optional.
    Absent,
    /// A converter was named but cannot be used. Already reported, or unresolved upstream.
    Rejected,
    /// A usable converter.
    Resolved(ConverterSpec),
}

/// Find the converter named by the first type-reference argument.
///
/// Reports `ConverterNotValueConverter` when the type is not a value
/// converter and `AmbiguousCapability` when it is one several ways over,
/// both at the type reference.
pub fn resolve_converter(
    site: &BindingSite,
    ctx: &Context<'_>,
    sink: &mut dyn DiagnosticSink,
) -> ConverterLookup {
    let Some((ty, location)) = site.type_reference() else {
        return ConverterLookup::Absent;
    };
    let Some(descriptor) = ctx.describe(ty) else {
        return ConverterLookup::Rejected;
    };

    let signature = &ctx.framework.value_converter;
    return match find_generic_capability(&descriptor, signature) {
        CapabilityMatch::Absent => {
            ctx.report(sink, RuleId::ConverterNotValueConverter, location, vec![ty.to_string()]);
            ConverterLookup::Rejected
        },
        CapabilityMatch::Ambiguous(candidates) => {
            ctx.report(
                sink,
                RuleId::AmbiguousCapability,
                location,
                vec![ty.to_string(), signature.name.clone(), render_type_list(&candidates)],
            );
            ConverterLookup::Rejected
        },
        CapabilityMatch::Present(args) => match args.as_slice() {
            [source, target] => ConverterLookup::Resolved(ConverterSpec {
                source: source.clone(),
                target: target.clone(),
            }),
            _ => ConverterLookup::Rejected,
        },
    };
}

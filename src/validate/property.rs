//! Property bindings: a view-model property bound to an element's bindable property.

use crate::catalog::{Diagnostic, RuleId};
use crate::converter::{ConverterLookup, resolve_converter};
use crate::relation::{extends, is_observable_list};
use crate::target::resolve_target;
use crate::types::{BindingSite, Declaration};
use crate::validate::{Context, DiagnosticSink};

/// Validate a property binding.
///
/// The property type must extend the target value type, or, with a
/// converter, extend the converter source while the converter target extends
/// the value type. Observable lists on both sides are always accepted.
pub fn validate_property(site: &BindingSite, ctx: &Context<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    check(site, ctx, &mut diagnostics);
    return diagnostics;
}

/// Sink-based body of [`validate_property`].
pub(crate) fn check(site: &BindingSite, ctx: &Context<'_>, sink: &mut dyn DiagnosticSink) {
    let Declaration::Property { ty: property_ty } = &site.declaration else {
        return;
    };
    let Some(target) = resolve_target(site, ctx, sink) else {
        return;
    };
    let Some(property) = ctx.describe(property_ty) else {
        return;
    };
    let Some(value) = ctx.describe(&target.value) else {
        return;
    };

    // Collections synchronize item by item at runtime.
    if is_observable_list(&property, ctx.framework) && is_observable_list(&value, ctx.framework) {
        tracing::trace!("observable list on both sides");
        return;
    }

    match resolve_converter(site, ctx, sink) {
        ConverterLookup::Absent => {
            if !extends(&property, &target.value) {
                ctx.report(
                    sink,
                    RuleId::PropertyToTargetWithoutConverter,
                    &site.location,
                    vec![property_ty.to_string(), target.value.to_string()],
                );
            }
        },
        ConverterLookup::Rejected => {},
        ConverterLookup::Resolved(converter) => {
            let Some(converter_target) = ctx.describe(&converter.target) else {
                return;
            };
            let accepts_property = extends(&property, &converter.source);
            let produces_value = extends(&converter_target, &target.value);
            if !(accepts_property && produces_value) {
                ctx.report(
                    sink,
                    RuleId::PropertyToTargetWithConverter,
                    &site.location,
                    vec![
                        property_ty.to_string(),
                        converter.source.to_string(),
                        converter.target.to_string(),
                        target.value.to_string(),
                    ],
                );
            }
        },
    }
}

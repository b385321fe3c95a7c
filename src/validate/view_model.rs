//! Class-level bindings: the view model itself.

use crate::catalog::{Diagnostic, RuleId};
use crate::relation::inherits_from;
use crate::types::{BindingSite, Declaration};
use crate::validate::{Context, DiagnosticSink};

/// Validate a class binding.
///
/// The class must derive from the observable object base through its base
/// chain, and the tag must carry exactly one argument. Both checks run
/// independently.
pub fn validate_view_model(site: &BindingSite, ctx: &Context<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    check(site, ctx, &mut diagnostics);
    return diagnostics;
}

/// Sink-based body of [`validate_view_model`].
pub(crate) fn check(site: &BindingSite, ctx: &Context<'_>, sink: &mut dyn DiagnosticSink) {
    let Declaration::Class { ty } = &site.declaration else {
        return;
    };

    if let Some(class) = ctx.describe(ty)
        && !inherits_from(&class, &ctx.framework.observable_object)
    {
        ctx.report(
            sink,
            RuleId::BindingObjectNotObservableObject,
            &site.location,
            vec![ty.to_string()],
        );
    }

    let count = site.arguments.len();
    if count != 1 {
        ctx.report(
            sink,
            RuleId::BindingObjectArgsCountNotOne,
            &site.location,
            vec![count.to_string()],
        );
    }
}

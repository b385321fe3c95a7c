//! Command bindings: a method or event field bound to an element command.

use crate::catalog::{Diagnostic, RuleId};
use crate::target::{BoundMember, bindable_value_type, resolve_member};
use crate::types::{BindingSite, Declaration, TypeRef, render_type_list};
use crate::validate::{Context, DiagnosticSink};

/// Validate a command binding.
///
/// The declared parameter types must equal the bound command template's
/// type arguments position by position. Equality is structural identity;
/// a subtype does not satisfy a parameter.
pub fn validate_command(site: &BindingSite, ctx: &Context<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    check(site, ctx, &mut diagnostics);
    return diagnostics;
}

/// Sink-based body of [`validate_command`].
pub(crate) fn check(site: &BindingSite, ctx: &Context<'_>, sink: &mut dyn DiagnosticSink) {
    let Some(declared) = declared_parameters(site, ctx) else {
        return;
    };
    let Some(bound) = resolve_member(site, ctx, sink) else {
        return;
    };
    let Some(expected) = expected_parameters(&bound, ctx, sink) else {
        return;
    };

    if expected != declared {
        ctx.report(
            sink,
            RuleId::CommandParameterMismatch,
            &site.location,
            vec![render_type_list(&expected), render_type_list(&declared)],
        );
    }
}

/// Parameter types the declaration offers: method parameters, or the type
/// arguments of an event field's command template.
fn declared_parameters(site: &BindingSite, ctx: &Context<'_>) -> Option<Vec<TypeRef>> {
    return match &site.declaration {
        Declaration::EventField { ty } => {
            if ctx.framework.command_template.matches(ty) {
                Some(ty.args.clone())
            } else {
                tracing::debug!(%ty, "event field is not a command template");
                None
            }
        },
        Declaration::Method { parameters } => Some(parameters.clone()),
        Declaration::Class { .. } | Declaration::Property { .. } => None,
    };
}

/// Parameter types the bound command accepts. The member is either a
/// command template itself or a bindable property carrying one.
fn expected_parameters(
    bound: &BoundMember,
    ctx: &Context<'_>,
    sink: &mut dyn DiagnosticSink,
) -> Option<Vec<TypeRef>> {
    let template = &ctx.framework.command_template;
    let member_ty = &bound.member.ty;
    if template.matches(member_ty) {
        return Some(member_ty.args.clone());
    }

    let value = bindable_value_type(bound, ctx, sink)?;
    if template.matches(&value) {
        return Some(value.args);
    }
    ctx.report(
        sink,
        RuleId::TargetNotCommand,
        &bound.reference.member_location,
        vec![member_ty.to_string()],
    );
    return None;
}

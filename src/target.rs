//! Resolution of a tag's `nameof(Owner.Member)` argument to an element and a
//! bindable value type.

use crate::catalog::RuleId;
use crate::relation::{extends, find_generic_capability};
use crate::types::{
    BindingSite, CapabilityMatch, NameReference, TypeDescriptor, TypeRef, render_type_list,
};
use crate::validate::{Context, DiagnosticSink};

/// A resolved binding target: the element type and the value type its property carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTarget {
    /// Static type of the owning element.
    pub element: TypeRef,
    /// Type argument of the member's bindable-property capability.
    pub value: TypeRef,
}

/// The member a name reference points at, before any bindability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundMember {
    /// Static type of the owning element.
    pub element: TypeRef,
    /// Resolved declared type of the member.
    pub member: TypeDescriptor,
    /// The name reference that was resolved.
    pub reference: NameReference,
}

/// Locate the single name reference and check its owner is an element.
///
/// Reports `TargetMustBeNameReference` at the tag when there is not exactly
/// one name reference, and `TargetNotElement` at the owner when the owner
/// does not extend the element marker. Owners or members that do not
/// resolve end the lookup without a diagnostic.
pub fn resolve_member(
    site: &BindingSite,
    ctx: &Context<'_>,
    sink: &mut dyn DiagnosticSink,
) -> Option<BoundMember> {
    let mut references = site.name_references();
    let (Some(reference), None) = (references.next(), references.next()) else {
        ctx.report(sink, RuleId::TargetMustBeNameReference, &site.location, Vec::new());
        return None;
    };

    let owner_ty = ctx.resolver.owner_type(site, &reference.owner)?;
    let owner = ctx.describe(&owner_ty)?;
    if !extends(&owner, &ctx.framework.element) {
        ctx.report(
            sink,
            RuleId::TargetNotElement,
            &reference.owner_location,
            vec![owner_ty.to_string()],
        );
        return None;
    }

    let member_ty = ctx.resolver.member_type(&owner_ty, &reference.member)?;
    let member = ctx.describe(&member_ty)?;
    return Some(BoundMember {
        element: owner_ty,
        member,
        reference: reference.clone(),
    });
}

/// Resolve the bound element and the value type of its bindable property.
///
/// On top of [`resolve_member`], reports `TargetPropertyNotBindable` at the
/// member when it carries no bindable-property capability and
/// `AmbiguousCapability` when it carries several distinct ones.
pub fn resolve_target(
    site: &BindingSite,
    ctx: &Context<'_>,
    sink: &mut dyn DiagnosticSink,
) -> Option<BindingTarget> {
    let bound = resolve_member(site, ctx, sink)?;
    let value = bindable_value_type(&bound, ctx, sink)?;
    return Some(BindingTarget {
        element: bound.element,
        value,
    });
}

/// Extract the value type from the member's bindable-property capability, reporting failures.
pub(crate) fn bindable_value_type(
    bound: &BoundMember,
    ctx: &Context<'_>,
    sink: &mut dyn DiagnosticSink,
) -> Option<TypeRef> {
    let signature = &ctx.framework.bindable_property;
    let location = &bound.reference.member_location;
    let member_ty = &bound.member.ty;

    return match find_generic_capability(&bound.member, signature) {
        CapabilityMatch::Absent => {
            ctx.report(
                sink,
                RuleId::TargetPropertyNotBindable,
                location,
                vec![member_ty.to_string()],
            );
            None
        },
        CapabilityMatch::Ambiguous(candidates) => {
            ctx.report(
                sink,
                RuleId::AmbiguousCapability,
                location,
                vec![member_ty.to_string(), signature.name.clone(), render_type_list(&candidates)],
            );
            None
        },
        CapabilityMatch::Present(args) => args.into_iter().next(),
    };
}

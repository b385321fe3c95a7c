//! Type relation queries: capability search and compatibility.
//!
//! Everything here is a pure function of its arguments. Descriptors carry
//! their full base chain and capability closure, so no query needs the graph.

use crate::framework::Framework;
use crate::types::{CapabilityMatch, Signature, TypeDescriptor, TypeKind, TypeRef};

/// Whether `sub` is compatible with `sup`: equal, inherits it through the
/// base chain, or implements it as a capability. Reflexive.
pub fn extends(sub: &TypeDescriptor, sup: &TypeRef) -> bool {
    return inherits_from(sub, sup) || is_capability(sub, sup);
}

/// Search the type (when it is itself a capability) and its full capability
/// set for instantiations of `signature`.
///
/// Structurally equal hits collapse into one. Distinct hits are reported as
/// ambiguous instead of picking one.
pub fn find_generic_capability(ty: &TypeDescriptor, signature: &Signature) -> CapabilityMatch {
    let own = (ty.kind == TypeKind::Capability).then_some(&ty.ty);
    let mut hits: Vec<&TypeRef> = Vec::new();
    for candidate in own.into_iter().chain(ty.capabilities.iter()) {
        if signature.matches(candidate) && !hits.contains(&candidate) {
            hits.push(candidate);
        }
    }

    return match hits.as_slice() {
        [] => CapabilityMatch::Absent,
        [single] => CapabilityMatch::Present(single.args.clone()),
        many => CapabilityMatch::Ambiguous(many.iter().map(|&c| return c.clone()).collect()),
    };
}

/// Whether `sub` is `sup` or has it on its base chain. Capabilities do not count.
pub fn inherits_from(sub: &TypeDescriptor, sup: &TypeRef) -> bool {
    return sub.ty == *sup || sub.bases.contains(sup);
}

/// Exact capability match on structural identity. Reflexive.
pub fn is_capability(ty: &TypeDescriptor, capability: &TypeRef) -> bool {
    return ty.ty == *capability || ty.capabilities.contains(capability);
}

/// Whether the type is, or implements, the read-only observable list capability.
pub fn is_observable_list(ty: &TypeDescriptor, framework: &Framework) -> bool {
    return !matches!(
        find_generic_capability(ty, &framework.observable_list),
        CapabilityMatch::Absent
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeRef {
        return TypeRef::named(name);
    }

    fn concrete(ty: TypeRef, bases: Vec<TypeRef>, capabilities: Vec<TypeRef>) -> TypeDescriptor {
        return TypeDescriptor { bases, capabilities, kind: TypeKind::Concrete, ty };
    }

    fn converter(source: &str, target: &str) -> TypeRef {
        return TypeRef::generic("Ui.IValueConverter", vec![named(source), named(target)]);
    }

    #[test]
    fn extends_is_reflexive() {
        let int = concrete(named("int"), vec![], vec![]);
        assert!(extends(&int, &named("int")));
        assert!(!extends(&int, &named("string")));
    }

    #[test]
    fn extends_follows_bases_and_capabilities() {
        let button = concrete(
            named("App.Button"),
            vec![named("Ui.Element"), named("object")],
            vec![named("Ui.IElement")],
        );
        assert!(extends(&button, &named("Ui.Element")));
        assert!(extends(&button, &named("object")));
        assert!(extends(&button, &named("Ui.IElement")));
        assert!(!inherits_from(&button, &named("Ui.IElement")));
    }

    #[test]
    fn capability_search_is_typed() {
        let conv = concrete(
            named("App.IntToString"),
            vec![],
            vec![
                TypeRef::generic("Vendor.IValueConverter", vec![named("int"), named("int")]),
                converter("int", "string"),
            ],
        );
        let signature = Signature::with_arity("Ui.IValueConverter", 2);
        assert_eq!(
            find_generic_capability(&conv, &signature),
            CapabilityMatch::Present(vec![named("int"), named("string")])
        );
    }

    #[test]
    fn duplicate_hits_collapse() {
        let same = vec![converter("int", "string"), converter("int", "string")];
        let conv = concrete(named("App.Conv"), vec![], same);
        let signature = Signature::with_arity("Ui.IValueConverter", 2);
        assert!(matches!(find_generic_capability(&conv, &signature), CapabilityMatch::Present(_)));
    }

    #[test]
    fn distinct_hits_are_ambiguous() {
        let distinct = vec![converter("int", "string"), converter("bool", "string")];
        let conv = concrete(named("App.Conv"), vec![], distinct);
        let signature = Signature::with_arity("Ui.IValueConverter", 2);
        let CapabilityMatch::Ambiguous(candidates) = find_generic_capability(&conv, &signature)
        else {
            panic!("expected ambiguity");
        };
        assert_eq!(candidates, vec![converter("int", "string"), converter("bool", "string")]);
    }

    #[test]
    fn capability_types_match_themselves() {
        let bindable = TypeDescriptor {
            bases: vec![],
            capabilities: vec![],
            kind: TypeKind::Capability,
            ty: TypeRef::generic("Ui.Bindable.IBindableProperty", vec![named("string")]),
        };
        let signature = Signature::with_arity("Ui.Bindable.IBindableProperty", 1);
        assert_eq!(
            find_generic_capability(&bindable, &signature),
            CapabilityMatch::Present(vec![named("string")])
        );
    }

    #[test]
    fn observable_lists() {
        let framework = Framework::default();
        let list = concrete(
            TypeRef::generic("Ui.Bindable.ObservableList", vec![named("int")]),
            vec![],
            vec![TypeRef::generic("Ui.Bindable.IReadOnlyObservableList", vec![named("int")])],
        );
        assert!(is_observable_list(&list, &framework));
        assert!(!is_observable_list(&concrete(named("int"), vec![], vec![]), &framework));
    }
}

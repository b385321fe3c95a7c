/// Well-known framework types the validators compare against.
use crate::types::{Signature, TypeRef};

/// Identities of the framework types that give bindings their meaning.
/// Built once (from defaults or configuration) and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framework {
    /// `IBindableProperty<T>`: element members that accept bindings.
    pub bindable_property: Signature,
    /// `CommandTemplate<...>`: commands, type arguments are the accepted parameters.
    pub command_template: Signature,
    /// Marker capability every bindable element implements.
    pub element: TypeRef,
    /// `IReadOnlyObservableList<T>`: collections that synchronize structurally.
    pub observable_list: Signature,
    /// Concrete base class of every bindable view model.
    pub observable_object: TypeRef,
    /// `IValueConverter<TSource, TTarget>`.
    pub value_converter: Signature,
}

impl Framework {
    /// Framework identities under custom names. Arities are fixed by role.
    pub fn named(names: &FrameworkNames<'_>) -> Self {
        return Self {
            bindable_property: Signature::with_arity(names.bindable_property, 1),
            command_template: Signature::any_arity(names.command_template),
            element: TypeRef::named(names.element),
            observable_list: Signature::with_arity(names.observable_list, 1),
            observable_object: TypeRef::named(names.observable_object),
            value_converter: Signature::with_arity(names.value_converter, 2),
        };
    }
}

impl Default for Framework {
    fn default() -> Self {
        return Self::named(&FrameworkNames::default());
    }
}

/// Qualified names for each framework role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkNames<'a> {
    /// See [`Framework::bindable_property`].
    pub bindable_property: &'a str,
    /// See [`Framework::command_template`].
    pub command_template: &'a str,
    /// See [`Framework::element`].
    pub element: &'a str,
    /// See [`Framework::observable_list`].
    pub observable_list: &'a str,
    /// See [`Framework::observable_object`].
    pub observable_object: &'a str,
    /// See [`Framework::value_converter`].
    pub value_converter: &'a str,
}

impl Default for FrameworkNames<'_> {
    /// The names declared by the built-in prelude.
    fn default() -> Self {
        return Self {
            bindable_property: "Ui.Bindable.IBindableProperty",
            command_template: "Ui.Bindable.CommandTemplate",
            element: "Ui.IElement",
            observable_list: "Ui.Bindable.IReadOnlyObservableList",
            observable_object: "Ui.Bindable.ObservableObject",
            value_converter: "Ui.IValueConverter",
        };
    }
}

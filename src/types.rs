/// Core domain types for bindcheck: type identities, descriptors, and binding sites.
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// Result of searching a type for a well-known generic capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityMatch {
    /// The type does not implement the capability.
    Absent,
    /// Several structurally distinct instantiations match. Callers must not pick one.
    Ambiguous(
        /// Every matching capability instantiation, in discovery order.
        Vec<TypeRef>,
    ),
    /// Exactly one instantiation matches.
    Present(
        /// The type arguments of the matching instantiation.
        Vec<TypeRef>,
    ),
}

/// Converter source and target types. Both halves exist or the converter is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterSpec {
    /// Type the converter accepts from the view model.
    pub source: TypeRef,
    /// Type the converter produces for the element.
    pub target: TypeRef,
}

/// The declaration a binding tag is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A view-model class.
    Class {
        /// The class being declared.
        ty: TypeRef,
    },
    /// An event field whose type is a command-template instantiation.
    EventField {
        /// Declared type of the event.
        ty: TypeRef,
    },
    /// A method bound as a command handler.
    Method {
        /// Parameter types in declaration order.
        parameters: Vec<TypeRef>,
    },
    /// A view-model property bound to an element property.
    Property {
        /// Declared type of the property.
        ty: TypeRef,
    },
}

impl Declaration {
    /// Which kind of declaration this is.
    pub const fn kind(&self) -> SiteKind {
        return match self {
            Self::Class { .. } => SiteKind::Class,
            Self::EventField { .. } => SiteKind::EventField,
            Self::Method { .. } => SiteKind::Method,
            Self::Property { .. } => SiteKind::Property,
        };
    }
}

/// One tagged declaration examined by the host. Read-only to validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSite {
    /// Tag arguments in source order.
    pub arguments: Vec<TagArgument>,
    /// The declaration owning the tag.
    pub declaration: Declaration,
    /// Location of the tag itself.
    pub location: Location,
    /// Name of the declared member or class.
    pub name: String,
    /// Which binding tag was applied.
    pub tag: Tag,
}

impl BindingSite {
    /// All name-reference arguments, in source order.
    pub fn name_references(&self) -> impl Iterator<Item = &NameReference> {
        return self.arguments.iter().filter_map(|arg| {
            return match arg {
                TagArgument::NameReference(reference) => Some(reference),
                TagArgument::Other { .. } | TagArgument::TypeReference { .. } => None,
            };
        });
    }

    /// The first type-reference argument and its location, if any.
    pub fn type_reference(&self) -> Option<(&TypeRef, &Location)> {
        return self.arguments.iter().find_map(|arg| {
            return match arg {
                TagArgument::TypeReference { location, ty } => Some((ty, location)),
                TagArgument::NameReference(_) | TagArgument::Other { .. } => None,
            };
        });
    }
}

/// A position in a binding model. Lines and columns are one-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Location {
    /// One-based column.
    pub column: u32,
    /// File the location belongs to.
    pub file: PathBuf,
    /// One-based line.
    pub line: u32,
}

impl Location {
    /// Same file and line, at a different column.
    pub fn at_column(&self, column: u32) -> Self {
        return Self {
            column,
            file: self.file.clone(),
            line: self.line,
        };
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}:{}:{}", self.file.display(), self.line, self.column);
    }
}

impl Ord for Location {
    /// Compare by (file, line, column) so reports read top to bottom.
    fn cmp(&self, other: &Self) -> Ordering {
        return (&self.file, self.line, self.column).cmp(&(&other.file, other.line, other.column));
    }
}

impl PartialOrd for Location {
    /// Delegate to `Ord` implementation.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

/// A name-only `Owner.Member` reference, e.g. `nameof(label.Text)`.
/// Denotes a member without evaluating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameReference {
    /// Member name on the owner.
    pub member: String,
    /// Location of the member segment.
    pub member_location: Location,
    /// Owner expression (an element identifier or a type name).
    pub owner: String,
    /// Location of the owner segment.
    pub owner_location: Location,
}

/// Typed identity of a well-known generic capability.
///
/// Matching compares the qualified name exactly and, when `arity` is set,
/// the number of type arguments. Namespace lookalikes never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Required number of type arguments; `None` accepts any arity.
    pub arity: Option<usize>,
    /// Fully qualified capability name, without type arguments.
    pub name: String,
}

impl Signature {
    /// Signature that accepts any arity.
    pub fn any_arity(name: &str) -> Self {
        return Self {
            arity: None,
            name: name.to_string(),
        };
    }

    /// Whether `ty` is an instantiation of this signature.
    pub fn matches(&self, ty: &TypeRef) -> bool {
        return ty.name == self.name && self.arity.is_none_or(|arity| return arity == ty.args.len());
    }

    /// Signature with a fixed arity.
    pub fn with_arity(name: &str, arity: usize) -> Self {
        return Self {
            arity: Some(arity),
            name: name.to_string(),
        };
    }
}

/// Kind of declaration a site is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteKind {
    /// Class-level binding.
    Class,
    /// Event field bound to a command.
    EventField,
    /// Method bound to a command.
    Method,
    /// Property bound to an element property.
    Property,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::EventField => "event field",
            Self::Method => "method",
            Self::Property => "property",
        };
        return f.write_str(name);
    }
}

/// The binding tag applied to a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub enum Tag {
    /// `Binding(...)`: property or class binding.
    Binding,
    /// `Command(...)`: method or event command binding.
    Command,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Self::Binding => f.write_str("Binding"),
            Self::Command => f.write_str("Command"),
        };
    }
}

/// One argument of a binding tag, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagArgument {
    /// `nameof(Owner.Member)`.
    NameReference(NameReference),
    /// Any other expression, e.g. a string literal.
    Other {
        /// Where the argument starts.
        location: Location,
        /// Raw argument text.
        text: String,
    },
    /// `typeof(T)`.
    TypeReference {
        /// Where the argument starts.
        location: Location,
        /// The referenced type.
        ty: TypeRef,
    },
}

impl TagArgument {
    /// Where the argument starts.
    pub const fn location(&self) -> &Location {
        return match self {
            Self::NameReference(reference) => &reference.owner_location,
            Self::Other { location, .. } | Self::TypeReference { location, .. } => location,
        };
    }
}

/// Resolved view of a type, supplied by a [`crate::validate::SymbolResolver`].
///
/// Compared structurally: two descriptors for the same logical type are equal
/// even when produced by separate resolution calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Ancestors along the base-type chain, nearest first. Excludes the type itself.
    pub bases: Vec<TypeRef>,
    /// Every implemented capability, including those inherited through bases
    /// and through other capabilities.
    pub capabilities: Vec<TypeRef>,
    /// Whether the type is itself a capability.
    pub kind: TypeKind,
    /// The type's own identity.
    pub ty: TypeRef,
}

/// Whether a declared type is a concrete type or a capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// An implemented contract (interface-like).
    Capability,
    /// A class, struct, or primitive.
    #[default]
    Concrete,
}

/// Structural type identity: qualified name plus generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef {
    /// Generic type arguments, empty for non-generic types.
    pub args: Vec<TypeRef>,
    /// Fully qualified name without type arguments.
    pub name: String,
}

impl TypeRef {
    /// A generic instantiation.
    pub fn generic(name: &str, args: Vec<Self>) -> Self {
        return Self {
            args,
            name: name.to_string(),
        };
    }

    /// A non-generic type.
    pub fn named(name: &str) -> Self {
        return Self {
            args: Vec::new(),
            name: name.to_string(),
        };
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        return f.write_str(">");
    }
}

/// Render a type list as `(A, B)`, the form used in command diagnostics.
pub fn render_type_list(types: &[TypeRef]) -> String {
    let joined = types.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    return format!("({joined})");
}

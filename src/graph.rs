//! In-memory type graph built from binding models. Implements [`SymbolResolver`]
//! for the command-line host.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::types::{BindingSite, TypeDescriptor, TypeKind, TypeRef};
use crate::validate::SymbolResolver;

/// Longest base chain followed before a declaration cycle is assumed.
const MAX_CHAIN: usize = 64;

/// A declared type, generic parameters not yet substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Direct base type. May mention `params`.
    pub base: Option<TypeRef>,
    /// Directly implemented capabilities. May mention `params`.
    pub capabilities: Vec<TypeRef>,
    /// Concrete type or capability.
    pub kind: TypeKind,
    /// Declared members and their types. May mention `params`.
    pub members: BTreeMap<String, TypeRef>,
    /// Fully qualified name.
    pub name: String,
    /// Generic parameter names, in order.
    pub params: Vec<String>,
}

/// Declarations keyed by `(name, arity)` plus the element identifiers each
/// model file brings into scope.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    /// Every declared type.
    decls: HashMap<(String, usize), TypeDecl>,
    /// Owner identifiers usable in name references, e.g. `label`, per file.
    elements: HashMap<(PathBuf, String), TypeRef>,
}

impl TypeGraph {
    /// Base chain of `ty`, nearest first, each link substituted.
    fn base_chain(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut chain: Vec<TypeRef> = Vec::new();
        let mut next = self.direct_base(ty);
        while let Some(base) = next {
            if chain.contains(&base) || *ty == base || chain.len() >= MAX_CHAIN {
                tracing::debug!(%ty, %base, "base chain cycle, truncating");
                break;
            }
            next = self.direct_base(&base);
            chain.push(base);
        }
        return chain;
    }

    /// Make `name` usable as the owner of a name reference in sites of `file`.
    pub fn bind_element(&mut self, file: &Path, name: &str, ty: TypeRef) {
        self.elements.insert((file.to_path_buf(), name.to_string()), ty);
    }

    /// Transitive capability set of `ty` given its base chain, in discovery order.
    fn capability_closure(&self, ty: &TypeRef, bases: &[TypeRef]) -> Vec<TypeRef> {
        let mut queue: VecDeque<TypeRef> = std::iter::once(ty)
            .chain(bases.iter())
            .flat_map(|t| return self.direct_capabilities(t))
            .collect();
        let mut closure: Vec<TypeRef> = Vec::new();
        while let Some(capability) = queue.pop_front() {
            if closure.contains(&capability) {
                continue;
            }
            queue.extend(self.direct_capabilities(&capability));
            closure.push(capability);
        }
        return closure;
    }

    /// Add a declaration. Returns `false`, leaving the graph unchanged, when
    /// a type with the same name and arity already exists.
    pub fn declare(&mut self, decl: TypeDecl) -> bool {
        let key = (decl.name.clone(), decl.params.len());
        if self.decls.contains_key(&key) {
            return false;
        }
        self.decls.insert(key, decl);
        return true;
    }

    /// Base declared directly on `ty`, substituted.
    fn direct_base(&self, ty: &TypeRef) -> Option<TypeRef> {
        let (decl, args) = self.instantiate(ty)?;
        return decl.base.as_ref().map(|b| return substitute(b, &decl.params, args));
    }

    /// Capabilities declared directly on `ty`, substituted.
    fn direct_capabilities(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let Some((decl, args)) = self.instantiate(ty) else {
            return Vec::new();
        };
        return decl.capabilities.iter().map(|c| return substitute(c, &decl.params, args)).collect();
    }

    /// Declaration for `ty` together with the arguments to substitute.
    fn instantiate<'a>(&self, ty: &'a TypeRef) -> Option<(&TypeDecl, &'a [TypeRef])> {
        let decl = self.decls.get(&(ty.name.clone(), ty.args.len()))?;
        return Some((decl, ty.args.as_slice()));
    }

    /// Whether nothing has been declared.
    pub fn is_empty(&self) -> bool {
        return self.decls.is_empty();
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        return self.decls.len();
    }
}

impl SymbolResolver for TypeGraph {
    fn describe(&self, ty: &TypeRef) -> Option<TypeDescriptor> {
        let (decl, _) = self.instantiate(ty)?;
        let bases = self.base_chain(ty);
        let capabilities = self.capability_closure(ty, &bases);
        return Some(TypeDescriptor {
            bases,
            capabilities,
            kind: decl.kind,
            ty: ty.clone(),
        });
    }

    fn member_type(&self, owner: &TypeRef, member: &str) -> Option<TypeRef> {
        return std::iter::once(owner.clone())
            .chain(self.base_chain(owner))
            .find_map(|ty| {
                let (decl, args) = self.instantiate(&ty)?;
                return decl.members.get(member).map(|m| return substitute(m, &decl.params, args));
            });
    }

    fn owner_type(&self, site: &BindingSite, owner: &str) -> Option<TypeRef> {
        if let Some(ty) = self.elements.get(&(site.location.file.clone(), owner.to_string())) {
            return Some(ty.clone());
        }
        let static_owner = TypeRef::named(owner);
        return self.instantiate(&static_owner).map(|_| return static_owner.clone());
    }
}

/// Replace generic parameter names in `ty` with the matching arguments.
fn substitute(ty: &TypeRef, params: &[String], args: &[TypeRef]) -> TypeRef {
    if ty.args.is_empty()
        && let Some(position) = params.iter().position(|p| return *p == ty.name)
        && let Some(arg) = args.get(position)
    {
        return arg.clone();
    }
    return TypeRef {
        args: ty.args.iter().map(|a| return substitute(a, params, args)).collect(),
        name: ty.name.clone(),
    };
}

//! Binding validators and the seams they are invoked through.
//!
//! A validator reads one [`BindingSite`], queries the [`SymbolResolver`], and
//! appends to a [`DiagnosticSink`]. Nothing is shared between calls except
//! the read-only [`Context`], so sites can be validated in any order and on
//! any thread.

pub mod command;
pub mod property;
pub mod view_model;

use crate::catalog::{Catalog, Diagnostic, RuleId};
use crate::framework::Framework;
use crate::types::{BindingSite, Declaration, Location, Tag, TypeDescriptor, TypeRef};

pub use command::validate_command;
pub use property::validate_property;
pub use view_model::validate_view_model;

/// Read-only inputs shared by every validation call.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// Rule table diagnostics are built from.
    pub catalog: &'a Catalog,
    /// Well-known framework identities.
    pub framework: &'a Framework,
    /// Symbol resolution collaborator.
    pub resolver: &'a dyn SymbolResolver,
}

impl Context<'_> {
    /// Describe a type through the resolver, logging when it does not resolve.
    pub(crate) fn describe(&self, ty: &TypeRef) -> Option<TypeDescriptor> {
        let described = self.resolver.describe(ty);
        if described.is_none() {
            tracing::trace!(%ty, "type does not resolve, skipping dependent check");
        }
        return described;
    }

    /// Build a diagnostic through the catalog and hand it to the sink.
    pub(crate) fn report(
        &self,
        sink: &mut dyn DiagnosticSink,
        rule: RuleId,
        location: &Location,
        arguments: Vec<String>,
    ) {
        if let Some(diagnostic) = self.catalog.diagnostic(rule, location.clone(), arguments) {
            tracing::debug!(rule = rule.code(), %location, "binding diagnostic");
            sink.report(diagnostic);
        }
    }
}

/// Append-only destination for diagnostics. Ordering is not significant.
pub trait DiagnosticSink {
    /// Accept one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl DiagnosticSink for crossbeam_channel::Sender<Diagnostic> {
    /// Forward to the channel. A disconnected receiver means the host stopped listening.
    fn report(&mut self, diagnostic: Diagnostic) {
        if self.send(diagnostic).is_err() {
            tracing::trace!("diagnostic receiver dropped");
        }
    }
}

/// Symbol resolution collaborator. Answers synchronous, read-only queries
/// against an externally managed type graph.
///
/// `None` means the entity does not resolve; validators then skip the
/// dependent check silently, since an earlier stage already explains the gap.
pub trait SymbolResolver: Send + Sync {
    /// Full descriptor for a type: base chain and transitive capabilities.
    fn describe(&self, ty: &TypeRef) -> Option<TypeDescriptor>;

    /// Declared type of `member` on `owner`, including inherited members.
    fn member_type(&self, owner: &TypeRef, member: &str) -> Option<TypeRef>;

    /// Static type of the owner expression of a name reference, in the scope of `site`.
    fn owner_type(&self, site: &BindingSite, owner: &str) -> Option<TypeRef>;
}

/// Run whichever validator matches the site's tag and declaration kind.
/// Combinations no validator handles produce nothing.
pub fn validate(site: &BindingSite, ctx: &Context<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_into(site, ctx, &mut diagnostics);
    return diagnostics;
}

/// Like [`validate`], writing into a caller-supplied sink.
pub fn validate_into(site: &BindingSite, ctx: &Context<'_>, sink: &mut dyn DiagnosticSink) {
    let _span = tracing::debug_span!(
        "site",
        name = %site.name,
        tag = %site.tag,
        kind = %site.declaration.kind()
    )
    .entered();
    match (site.tag, &site.declaration) {
        (Tag::Binding, Declaration::Class { .. }) => view_model::check(site, ctx, sink),
        (Tag::Binding, Declaration::Property { .. }) => property::check(site, ctx, sink),
        (Tag::Command, Declaration::EventField { .. } | Declaration::Method { .. }) => {
            command::check(site, ctx, sink);
        },
        (Tag::Binding, Declaration::EventField { .. } | Declaration::Method { .. })
        | (Tag::Command, Declaration::Class { .. } | Declaration::Property { .. }) => {
            tracing::debug!("no validator for this tag on this declaration");
        },
    }
}

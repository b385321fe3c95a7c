//! Binding model files (`*.bind.toml`): declared types, element scopes, and
//! the binding sites to validate.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::Error;
use crate::graph::{TypeDecl, TypeGraph};
use crate::typeexpr::parse_type;
use crate::types::{
    BindingSite, Declaration, Location, NameReference, SiteKind, Tag, TagArgument, TypeKind,
    TypeRef,
};

/// Framework declarations loaded ahead of every project.
const PRELUDE: &str = include_str!("prelude.toml");

/// Pseudo-path that prelude declarations are attributed to.
const PRELUDE_FILE: &str = "<prelude>";

/// Raw TOML structure of a model file.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModel {
    /// Owner identifier to type expression.
    #[serde(default)]
    elements: BTreeMap<String, String>,
    /// Binding sites.
    #[serde(default)]
    sites: Vec<RawSite>,
    /// Type declarations.
    #[serde(default)]
    types: Vec<RawType>,
}

/// Raw `[[sites]]` entry.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    /// Tag argument texts as written.
    #[serde(default)]
    arguments: Vec<String>,
    /// Column of the tag. Defaults to 1.
    column: Option<u32>,
    /// Declaration kind the tag is attached to.
    kind: SiteKind,
    /// One-based line of the tag.
    line: u32,
    /// Declaration name.
    name: String,
    /// Method parameter types.
    #[serde(default)]
    parameters: Vec<String>,
    /// Tag name.
    tag: Tag,
    /// Property, event field, or class type.
    #[serde(rename = "type")]
    ty: Option<String>,
}

/// Raw `[[types]]` entry.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawType {
    /// Direct base type expression.
    base: Option<String>,
    /// Directly implemented capability expressions.
    #[serde(default)]
    capabilities: Vec<String>,
    /// Concrete type or capability.
    #[serde(default)]
    kind: TypeKind,
    /// Member name to type expression.
    #[serde(default)]
    members: BTreeMap<String, String>,
    /// Qualified name.
    name: String,
    /// Generic parameter names.
    #[serde(default)]
    params: Vec<String>,
}

/// Recognizers for the argument forms a tag can carry.
struct ArgumentPatterns {
    /// `nameof(Owner.Member)`.
    name_reference: Regex,
    /// `typeof(Type)`.
    type_reference: Regex,
}

impl ArgumentPatterns {
    /// Compile the argument recognizers.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pattern` if a recognizer fails to compile.
    fn new() -> Result<Self, Error> {
        return Ok(Self {
            name_reference: Regex::new(
                r"^nameof\(\s*([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)\s*\)$",
            )?,
            type_reference: Regex::new(r"^typeof\(\s*(.+?)\s*\)$")?,
        });
    }
}

/// Every declared type plus every binding site of a project.
pub struct Model {
    /// Types from the prelude and all loaded files.
    pub graph: TypeGraph,
    /// Argument recognizers, compiled once.
    patterns: ArgumentPatterns,
    /// Sites in load order.
    pub sites: Vec<BindingSite>,
}

impl Model {
    /// Classify one argument text starting at `location`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTypeExpression` if a `typeof` operand does not parse.
    fn classify(&self, text: &str, location: &Location) -> Result<TagArgument, Error> {
        if let Some(caps) = self.patterns.name_reference.captures(text)
            && let (Some(owner), Some(member)) = (caps.get(1), caps.get(2))
        {
            return Ok(TagArgument::NameReference(NameReference {
                member: member.as_str().to_string(),
                member_location: location
                    .at_column(offset_column(location.column, text, member.start())),
                owner: owner.as_str().to_string(),
                owner_location: location
                    .at_column(offset_column(location.column, text, owner.start())),
            }));
        }
        if let Some(caps) = self.patterns.type_reference.captures(text)
            && let Some(operand) = caps.get(1)
        {
            return Ok(TagArgument::TypeReference {
                location: location.clone(),
                ty: parse_type(operand.as_str())?,
            });
        }
        return Ok(TagArgument::Other {
            location: location.clone(),
            text: text.to_string(),
        });
    }

    /// Add one model file's declarations and sites. `file` is the path
    /// diagnostics will report.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseFailed` for malformed TOML or type expressions,
    /// `Error::DuplicateType` when a declaration clashes with an existing one,
    /// or `Error::InvalidSite` for a site missing required fields.
    pub fn add_source(&mut self, content: &str, file: &Path) -> Result<(), Error> {
        let raw: RawModel = toml::from_str(content).map_err(|e| {
            return Error::ParseFailed {
                file: file.to_path_buf(),
                reason: e.to_string(),
            };
        })?;

        for ty in raw.types {
            let decl = lower_type(ty, file)?;
            let (name, arity) = (decl.name.clone(), decl.params.len());
            if !self.graph.declare(decl) {
                return Err(Error::DuplicateType {
                    arity,
                    file: file.to_path_buf(),
                    name,
                });
            }
        }

        for (name, expr) in raw.elements {
            let ty = parse_in(&expr, file)?;
            self.graph.bind_element(file, &name, ty);
        }

        for site in raw.sites {
            let lowered = self.lower_site(site, file)?;
            self.sites.push(lowered);
        }
        tracing::debug!(
            file = %file.display(),
            types = self.graph.len(),
            sites = self.sites.len(),
            "model loaded"
        );
        return Ok(());
    }

    /// Load the prelude followed by each file, reading them from disk.
    /// Files are reported relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a file cannot be read, or any error from
    /// [`Model::add_source`].
    pub fn load(root: &Path, files: &[PathBuf]) -> Result<Self, Error> {
        let mut model = Self::new()?;
        for relative in files {
            let content = std::fs::read_to_string(root.join(relative))?;
            model.add_source(&content, relative)?;
        }
        return Ok(model);
    }

    /// Turn a raw site into a binding site with located arguments.
    fn lower_site(&self, raw: RawSite, file: &Path) -> Result<BindingSite, Error> {
        let location = Location {
            column: raw.column.unwrap_or(1),
            file: file.to_path_buf(),
            line: raw.line,
        };
        let invalid = |reason: String| {
            return Error::InvalidSite {
                file: file.to_path_buf(),
                line: raw.line,
                reason,
            };
        };
        if raw.line == 0 {
            return Err(invalid("lines are numbered from 1".to_string()));
        }
        if raw.column == Some(0) {
            return Err(invalid("columns are numbered from 1".to_string()));
        }

        let declared_type = |ty: &Option<String>| {
            let Some(expr) = ty else {
                return Err(invalid(format!("a {} site needs a `type`", raw.kind)));
            };
            return parse_type(expr).map_err(|e| return invalid(e.to_string()));
        };
        let declaration = match raw.kind {
            SiteKind::Class => Declaration::Class {
                ty: declared_type(&raw.ty)?,
            },
            SiteKind::EventField => Declaration::EventField {
                ty: declared_type(&raw.ty)?,
            },
            SiteKind::Method => Declaration::Method {
                parameters: raw
                    .parameters
                    .iter()
                    .map(|p| return parse_type(p).map_err(|e| return invalid(e.to_string())))
                    .collect::<Result<Vec<_>, _>>()?,
            },
            SiteKind::Property => Declaration::Property {
                ty: declared_type(&raw.ty)?,
            },
        };

        let mut arguments = Vec::with_capacity(raw.arguments.len());
        let mut column = location
            .column
            .saturating_add(width(&raw.tag.to_string()))
            .saturating_add(1);
        for text in &raw.arguments {
            let argument = self
                .classify(text, &location.at_column(column))
                .map_err(|e| return invalid(e.to_string()))?;
            arguments.push(argument);
            column = column.saturating_add(width(text)).saturating_add(2);
        }

        return Ok(BindingSite {
            arguments,
            declaration,
            location,
            name: raw.name,
            tag: raw.tag,
        });
    }

    /// Empty project: only the prelude is declared.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pattern` if an argument recognizer fails to compile,
    /// or a parse error if the built-in prelude is malformed.
    pub fn new() -> Result<Self, Error> {
        let mut model = Self {
            graph: TypeGraph::default(),
            patterns: ArgumentPatterns::new()?,
            sites: Vec::new(),
        };
        model.add_source(PRELUDE, Path::new(PRELUDE_FILE))?;
        return Ok(model);
    }

    /// Prelude plus a single in-memory model file.
    ///
    /// # Errors
    ///
    /// Same as [`Model::add_source`].
    pub fn parse(content: &str, file: &Path) -> Result<Self, Error> {
        let mut model = Self::new()?;
        model.add_source(content, file)?;
        return Ok(model);
    }
}

/// Turn a raw declaration into a graph declaration.
fn lower_type(raw: RawType, file: &Path) -> Result<TypeDecl, Error> {
    let base = raw.base.as_deref().map(|b| return parse_in(b, file)).transpose()?;
    let capabilities = raw
        .capabilities
        .iter()
        .map(|c| return parse_in(c, file))
        .collect::<Result<Vec<_>, _>>()?;
    let members = raw
        .members
        .into_iter()
        .map(|(name, expr)| return parse_in(&expr, file).map(|ty| return (name, ty)))
        .collect::<Result<BTreeMap<_, _>, _>>()?;
    return Ok(TypeDecl {
        base,
        capabilities,
        kind: raw.kind,
        members,
        name: raw.name,
        params: raw.params,
    });
}

/// Column of the character at byte `offset` of `text`, where `text` starts at `start`.
fn offset_column(start: u32, text: &str, offset: usize) -> u32 {
    return start.saturating_add(width(text.get(..offset).unwrap_or_default()));
}

/// Parse a type expression, attributing failures to `file`.
fn parse_in(expr: &str, file: &Path) -> Result<TypeRef, Error> {
    return parse_type(expr).map_err(|e| {
        return Error::ParseFailed {
            file: file.to_path_buf(),
            reason: e.to_string(),
        };
    });
}

/// Rendered width of `text` in columns.
fn width(text: &str) -> u32 {
    return u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests unwrap freely")]
mod tests {
    use super::*;
    use crate::validate::SymbolResolver;

    const LABEL: &str = r#"
[elements]
title = "App.Label"

[[types]]
name = "App.Label"
base = "Ui.Element"
[types.members]
Text = "Ui.Bindable.BindableProperty<string>"

[[sites]]
tag = "Binding"
kind = "property"
name = "Title"
type = "string"
arguments = ["nameof(title.Text)", "typeof(App.Conv)"]
line = 4
column = 5
"#;

    #[test]
    fn locates_arguments_inside_the_rendered_tag() {
        let model = Model::parse(LABEL, Path::new("v.bind.toml")).unwrap();
        let site = model.sites.first().unwrap();
        // Binding(nameof(title.Text), typeof(App.Conv)) starting at column 5.
        let Some(TagArgument::NameReference(reference)) = site.arguments.first() else {
            panic!("expected a name reference");
        };
        assert_eq!(reference.owner_location.column, 20);
        assert_eq!(reference.member_location.column, 26);
        let Some(TagArgument::TypeReference { location, ty }) = site.arguments.get(1) else {
            panic!("expected a type reference");
        };
        assert_eq!(location.column, 33);
        assert_eq!(ty, &TypeRef::named("App.Conv"));
    }

    #[test]
    fn members_resolve_through_declared_bases() {
        let model = Model::parse(LABEL, Path::new("v.bind.toml")).unwrap();
        let label = TypeRef::named("App.Label");
        let text = model.graph.member_type(&label, "Text").unwrap();
        assert_eq!(text.to_string(), "Ui.Bindable.BindableProperty<string>");
        let described = model.graph.describe(&label).unwrap();
        assert!(described.capabilities.contains(&TypeRef::named("Ui.IElement")));
    }

    #[test]
    fn rejects_duplicate_declarations() {
        let content = "[[types]]\nname = \"Ui.Element\"\n";
        let err = Model::parse(content, Path::new("dup.bind.toml")).err().unwrap();
        assert!(matches!(
            err,
            Error::DuplicateType { ref name, arity: 0, .. } if name == "Ui.Element"
        ));
    }

    #[test]
    fn property_sites_need_a_type() {
        let content = "[[sites]]\ntag = \"Binding\"\nkind = \"property\"\nname = \"X\"\nline = 2\n";
        let err = Model::parse(content, Path::new("s.bind.toml")).err().unwrap();
        assert!(matches!(err, Error::InvalidSite { line: 2, .. }));
    }

    #[test]
    fn positions_are_one_based() {
        let site = "[[sites]]\ntag = \"Binding\"\nkind = \"class\"\nname = \"Vm\"\ntype = \"App.Vm\"\n";
        let zero_line = format!("{site}line = 0\n");
        let err = Model::parse(&zero_line, Path::new("s.bind.toml")).err().unwrap();
        assert!(matches!(err, Error::InvalidSite { line: 0, .. }));

        let zero_column = format!("{site}line = 4\ncolumn = 0\n");
        let err = Model::parse(&zero_column, Path::new("s.bind.toml")).err().unwrap();
        assert!(matches!(
            err,
            Error::InvalidSite { line: 4, ref reason, .. } if reason.contains("columns")
        ));
    }

    #[test]
    fn unrecognized_arguments_stay_other() {
        let content = "[[sites]]\ntag = \"Binding\"\nkind = \"class\"\nname = \"Vm\"\ntype = \"App.Vm\"\narguments = [\"\\\"title\\\"\"]\nline = 1\n";
        let model = Model::parse(content, Path::new("s.bind.toml")).unwrap();
        let site = model.sites.first().unwrap();
        assert!(matches!(
            site.arguments.first(),
            Some(TagArgument::Other { text, .. }) if text == "\"title\""
        ));
    }
}

//! Diagnostic catalog: the single table every binding diagnostic is built from.
//!
//! Rule codes and message templates are an external contract. Suppression
//! entries and baselines refer to them, so a published code is never
//! renumbered or reused.

use std::fmt;

use crate::types::Location;

/// Category shared by every binding rule.
const CATEGORY: &str = "Binding";

/// Title shared by every binding rule.
pub const TITLE: &str = "InvalidBinding";

/// Immutable rule table, built once from configuration and shared by reference.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// One entry per [`RuleId`], in `RuleId::ALL` order.
    rules: Vec<Rule>,
}

impl Catalog {
    /// Build a diagnostic for `id`, or `None` when the rule is disabled.
    pub fn diagnostic(
        &self,
        id: RuleId,
        location: Location,
        arguments: Vec<String>,
    ) -> Option<Diagnostic> {
        let rule = self.rule(id)?;
        if !rule.enabled {
            return None;
        }
        return Some(Diagnostic {
            arguments,
            location,
            rule: id,
            severity: rule.severity,
            template: rule.message,
        });
    }

    /// Switch a rule off. Only meaningful while the catalog is being configured.
    #[must_use]
    pub fn disable(mut self, id: RuleId) -> Self {
        if let Some(rule) = self.rules.iter_mut().find(|r| return r.id == id) {
            rule.enabled = false;
        }
        return self;
    }

    /// Look up a rule. A catalog built from [`Catalog::standard`] has every rule.
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        return self.rules.iter().find(|r| return r.id == id);
    }

    /// All rules in code order.
    pub fn rules(&self) -> &[Rule] {
        return &self.rules;
    }

    /// The published rule table with default severities, everything enabled.
    pub fn standard() -> Self {
        return Self {
            rules: RuleId::ALL.iter().map(|&id| return standard_rule(id)).collect(),
        };
    }

    /// Override the severity of a rule. Only meaningful while the catalog is being configured.
    #[must_use]
    pub fn with_severity(mut self, id: RuleId, severity: Severity) -> Self {
        if let Some(rule) = self.rules.iter_mut().find(|r| return r.id == id) {
            rule.severity = severity;
        }
        return self;
    }
}

impl Default for Catalog {
    fn default() -> Self {
        return Self::standard();
    }
}

/// One reported binding failure. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// Positional arguments substituted into the template.
    pub arguments: Vec<String>,
    /// Where the failure is reported.
    pub location: Location,
    /// The rule that fired.
    pub rule: RuleId,
    /// Effective severity after configuration.
    pub severity: Severity,
    /// Message template with `{0}`-style placeholders.
    pub template: &'static str,
}

impl Diagnostic {
    /// The message with arguments substituted.
    pub fn message(&self) -> String {
        return render_template(self.template, &self.arguments);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(
            f,
            "{}: {}[{}]: {}",
            self.location,
            self.severity,
            self.rule.code(),
            self.message()
        );
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Grouping shown by hosts.
    pub category: &'static str,
    /// Whether the rule reports at all.
    pub enabled: bool,
    /// Stable identifier.
    pub id: RuleId,
    /// Message template with `{0}`-style placeholders.
    pub message: &'static str,
    /// Effective severity.
    pub severity: Severity,
    /// Short title.
    pub title: &'static str,
}

/// Stable rule identifiers. Serialized as their `BNDxxxx` code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
pub enum RuleId {
    /// A generic capability lookup found several distinct instantiations.
    #[serde(rename = "BND0010")]
    AmbiguousCapability,
    /// A class binding tag does not carry exactly one argument.
    #[serde(rename = "BND0009")]
    BindingObjectArgsCountNotOne,
    /// A class binding targets a class outside the observable-object hierarchy.
    #[serde(rename = "BND0008")]
    BindingObjectNotObservableObject,
    /// Command parameters differ from the bound command template.
    #[serde(rename = "BND0007")]
    CommandParameterMismatch,
    /// The `typeof` argument is not a value converter.
    #[serde(rename = "BND0003")]
    ConverterNotValueConverter,
    /// Converter source or target does not line up with the binding.
    #[serde(rename = "BND0005")]
    PropertyToTargetWithConverter,
    /// Property type does not extend the target value type and no converter is given.
    #[serde(rename = "BND0004")]
    PropertyToTargetWithoutConverter,
    /// The target is not given as a single `nameof(Element.Property)` reference.
    #[serde(rename = "BND0006")]
    TargetMustBeNameReference,
    /// A command binding's member carries no command template.
    #[serde(rename = "BND0011")]
    TargetNotCommand,
    /// The owner of the target is not an element.
    #[serde(rename = "BND0001")]
    TargetNotElement,
    /// The target member is not a bindable property.
    #[serde(rename = "BND0002")]
    TargetPropertyNotBindable,
}

impl RuleId {
    /// Every rule, in code order.
    pub const ALL: [Self; 11] = [
        Self::TargetNotElement,
        Self::TargetPropertyNotBindable,
        Self::ConverterNotValueConverter,
        Self::PropertyToTargetWithoutConverter,
        Self::PropertyToTargetWithConverter,
        Self::TargetMustBeNameReference,
        Self::CommandParameterMismatch,
        Self::BindingObjectNotObservableObject,
        Self::BindingObjectArgsCountNotOne,
        Self::AmbiguousCapability,
        Self::TargetNotCommand,
    ];

    /// The published code, e.g. `BND0004`.
    pub const fn code(self) -> &'static str {
        return match self {
            Self::AmbiguousCapability => "BND0010",
            Self::BindingObjectArgsCountNotOne => "BND0009",
            Self::BindingObjectNotObservableObject => "BND0008",
            Self::CommandParameterMismatch => "BND0007",
            Self::ConverterNotValueConverter => "BND0003",
            Self::PropertyToTargetWithConverter => "BND0005",
            Self::PropertyToTargetWithoutConverter => "BND0004",
            Self::TargetMustBeNameReference => "BND0006",
            Self::TargetNotCommand => "BND0011",
            Self::TargetNotElement => "BND0001",
            Self::TargetPropertyNotBindable => "BND0002",
        };
    }

    /// Look up a rule by code. Case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        return Self::ALL.into_iter().find(|id| return id.code().eq_ignore_ascii_case(code.trim()));
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(self.code());
    }
}

/// How serious a diagnostic is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The binding cannot work.
    Error,
    /// Informational only.
    Info,
    /// Suspicious but tolerated.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        };
        return f.write_str(label);
    }
}

/// Substitute `{n}` placeholders. Unknown indices and stray braces are kept verbatim.
fn render_template(template: &str, arguments: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let (before, from_brace) = rest.split_at(open);
        out.push_str(before);
        let substituted = from_brace.get(1..).and_then(|after| {
            let close = after.find('}')?;
            let index: usize = after.get(..close)?.parse().ok()?;
            let arg = arguments.get(index)?;
            return Some((arg, after.get(close.saturating_add(1)..)?));
        });
        match substituted {
            Some((arg, remainder)) => {
                out.push_str(arg);
                rest = remainder;
            },
            None => {
                out.push('{');
                rest = from_brace.get(1..).unwrap_or("");
            },
        }
    }
    out.push_str(rest);
    return out;
}

/// The published definition of a rule.
const fn standard_rule(id: RuleId) -> Rule {
    let message = match id {
        RuleId::AmbiguousCapability => {
            "Type '{0}' implements '{1}' more than once ({2}); the binding is ambiguous."
        },
        RuleId::BindingObjectArgsCountNotOne => {
            "Binding attribute args count must be 1, but got {0}."
        },
        RuleId::BindingObjectNotObservableObject => {
            "Target object '{0}' does not derive from the observable object base."
        },
        RuleId::CommandParameterMismatch => {
            "Command parameter mismatch, expected '{0}' but got '{1}'."
        },
        RuleId::ConverterNotValueConverter => "Converter '{0}' is not a value converter.",
        RuleId::PropertyToTargetWithConverter => {
            "Can not convert property type '{0}' to converter source type '{1}' or converter target type '{2}' to target value type '{3}'."
        },
        RuleId::PropertyToTargetWithoutConverter => {
            "Can not convert property type '{0}' to target value type '{1}'. Consider using a value converter or changing the property type."
        },
        RuleId::TargetMustBeNameReference => {
            "The target must be a single name reference of the form 'nameof(Element.Property)'."
        },
        RuleId::TargetNotCommand => "Target property '{0}' is not a command template.",
        RuleId::TargetNotElement => "Target '{0}' is not an element.",
        RuleId::TargetPropertyNotBindable => "Target property '{0}' is not a bindable property.",
    };
    return Rule {
        category: CATEGORY,
        enabled: true,
        id,
        message,
        severity: Severity::Error,
        title: TITLE,
    };
}

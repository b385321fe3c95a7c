use std::collections::BTreeMap;
use std::path::Path;

use crate::catalog::{Catalog, RuleId, Severity};
use crate::error::Error;
use crate::framework::{Framework, FrameworkNames};

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = ".bindcheck.toml";

/// Project configuration loaded from `.bindcheck.toml`.
/// Include/exclude patterns are path prefixes applied to model files.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Rules switched off entirely.
    disabled: Vec<RuleId>,
    /// Path prefixes never scanned.
    exclude: Vec<String>,
    /// Overrides for framework type names.
    framework: RawFramework,
    /// Path prefixes scanned. Empty means everything.
    include: Vec<String>,
    /// Per-rule severity overrides.
    severity: Vec<(RuleId, Severity)>,
    /// Validation thread count, when pinned.
    workers: Option<usize>,
}

/// Raw TOML structure for `.bindcheck.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct BindcheckTomlConfig {
    #[serde(default)]
    disabled: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    framework: RawFramework,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    severity: BTreeMap<String, Severity>,
    workers: Option<usize>,
}

/// `[framework]` table. Missing entries keep the prelude names.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFramework {
    bindable_property: Option<String>,
    command_template: Option<String>,
    element: Option<String>,
    observable_list: Option<String>,
    observable_object: Option<String>,
    value_converter: Option<String>,
}

impl Config {
    /// Rule table with this project's severities and disabled rules applied.
    pub fn catalog(&self) -> Catalog {
        let with_severities = self
            .severity
            .iter()
            .fold(Catalog::standard(), |catalog, &(id, severity)| {
                return catalog.with_severity(id, severity);
            });
        return self
            .disabled
            .iter()
            .fold(with_severities, |catalog, &id| return catalog.disable(id));
    }

    /// Framework identities, with configured names replacing the defaults.
    pub fn framework(&self) -> Framework {
        let defaults = FrameworkNames::default();
        let raw = &self.framework;
        return Framework::named(&FrameworkNames {
            bindable_property: raw
                .bindable_property
                .as_deref()
                .unwrap_or(defaults.bindable_property),
            command_template: raw.command_template.as_deref().unwrap_or(defaults.command_template),
            element: raw.element.as_deref().unwrap_or(defaults.element),
            observable_list: raw.observable_list.as_deref().unwrap_or(defaults.observable_list),
            observable_object: raw
                .observable_object
                .as_deref()
                .unwrap_or(defaults.observable_object),
            value_converter: raw.value_converter.as_deref().unwrap_or(defaults.value_converter),
        });
    }

    /// Load config from `.bindcheck.toml` in the given root directory.
    /// Returns a default that scans everything if the file doesn't exist.
    /// Returns an error if the file exists but is malformed: never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::ParseFailed` if the TOML is malformed, or `Error::UnknownRule`
    /// if a rule code is not in the catalog.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(&content, &path);
    }

    /// Parse config text. `path` is only used in error reports.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus I/O.
    pub fn parse(content: &str, path: &Path) -> Result<Self, Error> {
        let raw: BindcheckTomlConfig = toml::from_str(content).map_err(|e| {
            return Error::ParseFailed {
                file: path.to_path_buf(),
                reason: e.to_string(),
            };
        })?;

        let disabled = raw
            .disabled
            .iter()
            .map(|code| return rule_id(code))
            .collect::<Result<Vec<_>, _>>()?;
        let severity = raw
            .severity
            .into_iter()
            .map(|(code, severity)| return rule_id(&code).map(|id| return (id, severity)))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Self {
            disabled,
            exclude: raw.exclude,
            framework: raw.framework,
            include: raw.include,
            severity,
            workers: raw.workers.filter(|&w| return w > 0),
        });
    }

    /// Check whether a model file path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self
                .include
                .iter()
                .any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }

    /// Configured thread count, if any.
    pub const fn workers(&self) -> Option<usize> {
        return self.workers;
    }
}

/// Resolve a rule code written in configuration.
fn rule_id(code: &str) -> Result<RuleId, Error> {
    return RuleId::from_code(code).ok_or_else(|| {
        return Error::UnknownRule {
            code: code.to_string(),
        };
    });
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests unwrap freely")]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Config, Error> {
        return Config::parse(content, Path::new(CONFIG_FILE));
    }

    #[test]
    fn applies_severity_overrides_and_disabled_rules() {
        let config =
            parse("disabled = [\"bnd0009\"]\n[severity]\nBND0004 = \"warning\"\n").unwrap();
        let catalog = config.catalog();
        assert!(!catalog.rule(RuleId::BindingObjectArgsCountNotOne).unwrap().enabled);
        assert_eq!(
            catalog.rule(RuleId::PropertyToTargetWithoutConverter).unwrap().severity,
            Severity::Warning
        );
        assert_eq!(catalog.rule(RuleId::TargetNotElement).unwrap().severity, Severity::Error);
    }

    #[test]
    fn rejects_unknown_rule_codes() {
        let err = parse("disabled = [\"BND9999\"]\n").unwrap_err();
        assert!(matches!(err, Error::UnknownRule { ref code } if code == "BND9999"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(matches!(parse("include = 3\n"), Err(Error::ParseFailed { .. })));
    }

    #[test]
    fn framework_names_override_individually() {
        let config = parse("[framework]\nelement = \"My.IWidget\"\n").unwrap();
        let framework = config.framework();
        assert_eq!(framework.element.name, "My.IWidget");
        assert_eq!(framework.observable_object, Framework::default().observable_object);
    }

    #[test]
    fn include_then_exclude_prefixes() {
        let config = parse("include = [\"views/\"]\nexclude = [\"views/legacy/\"]\n").unwrap();
        assert!(config.should_scan("views/main.bind.toml"));
        assert!(!config.should_scan("views/legacy/old.bind.toml"));
        assert!(!config.should_scan("other/main.bind.toml"));
    }
}

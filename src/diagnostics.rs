//! Rendering: binding diagnostics for people and tools, host errors as markdown.

use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::{Diagnostic, Severity};
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// How `check` prints diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One `file:line:col: severity[CODE]: message` line per diagnostic.
    #[default]
    Human,
    /// A JSON array of diagnostic objects.
    Json,
}

/// Per-severity tally of a diagnostic set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Error-severity diagnostics.
    pub errors: usize,
    /// Info-severity diagnostics.
    pub infos: usize,
    /// Warning-severity diagnostics.
    pub warnings: usize,
}

impl Counts {
    /// Tally `diagnostics` by severity.
    pub fn of(diagnostics: &[Diagnostic]) -> Self {
        return diagnostics.iter().fold(Self::default(), |mut counts, d| {
            match d.severity {
                Severity::Error => counts.errors = counts.errors.saturating_add(1),
                Severity::Info => counts.infos = counts.infos.saturating_add(1),
                Severity::Warning => counts.warnings = counts.warnings.saturating_add(1),
            }
            return counts;
        });
    }
}

/// JSON shape of one diagnostic.
#[derive(Serialize)]
struct DiagnosticJson {
    code: &'static str,
    column: u32,
    file: String,
    line: u32,
    message: String,
    severity: Severity,
    title: &'static str,
}

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// One line per diagnostic, compiler style.
pub fn render_human(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        let _ = writeln!(out, "{}: {}[{}]: {}", d.location, d.severity, d.rule, d.message());
    }
    return out;
}

/// Diagnostics as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn render_json(diagnostics: &[Diagnostic]) -> Result<String, Error> {
    let rows: Vec<DiagnosticJson> = diagnostics
        .iter()
        .map(|d| {
            return DiagnosticJson {
                code: d.rule.code(),
                column: d.location.column,
                file: d.location.file.display().to_string(),
                line: d.location.line,
                message: d.message(),
                severity: d.severity,
                title: crate::catalog::TITLE,
            };
        })
        .collect();
    return Ok(serde_json::to_string_pretty(&rows)?);
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::BaselineCorrupt { reason } => format!(
            "\
# Error: Baseline Corrupt

{reason}

## Fix

Regenerate the baseline:

    bindcheck baseline
"
        ),
        Error::DuplicateType { arity, file, name } => format!(
            "\
# Error: Duplicate Type

`{name}` with {arity} type parameter(s) is declared twice; the second declaration is in `{}`.

## Fix

Rename one declaration or change its parameter count. Framework types are
declared by the built-in prelude and cannot be redeclared.
",
            file.display()
        ),
        Error::InvalidSite { file, line, reason } => format!(
            "\
# Error: Invalid Site

`{}:{line}`: {reason}
",
            file.display()
        ),
        Error::ParseFailed { file, reason } => format!(
            "\
# Error: Parse Failed

Could not parse `{}`: {reason}
",
            file.display()
        ),
        Error::UnknownRule { code } => render_unknown_rule(code),
        Error::InvalidTypeExpression { .. }
        | Error::Io(_)
        | Error::Json(_)
        | Error::Pattern(_)
        | Error::TomlSer(_)
        | Error::Watch { .. } => format!(
            "\
# Error

{e}
"
        ),
    };
}

/// Summary line after a check, e.g. `2 errors, 1 warning (3 baselined)`.
pub fn render_summary(counts: Counts, hidden: usize) -> String {
    let mut out = if counts == Counts::default() {
        "No binding problems".to_string()
    } else {
        let mut parts = Vec::new();
        let tallies = [
            (counts.errors, "error"),
            (counts.warnings, "warning"),
            (counts.infos, "info"),
        ];
        for (n, label) in tallies {
            if n > 0 {
                let plural = if n == 1 || label == "info" { "" } else { "s" };
                parts.push(format!("{n} {label}{plural}"));
            }
        }
        parts.join(", ")
    };
    if hidden > 0 {
        let _ = write!(out, " ({hidden} baselined)");
    }
    return out;
}

/// Markdown block listing valid codes after a bad one.
fn render_unknown_rule(code: &str) -> String {
    let mut out = format!(
        "\
# Error: Unknown Rule

`{code}` is not a bindcheck rule.

## Available rules

"
    );
    for id in crate::catalog::RuleId::ALL {
        let _ = writeln!(out, "- `{id}`");
    }
    out.push_str("\nRun `bindcheck rules` for descriptions.\n");
    return out;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests unwrap freely")]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::catalog::{Catalog, RuleId};
    use crate::types::Location;

    fn sample() -> Vec<Diagnostic> {
        let location = Location { column: 7, file: PathBuf::from("main.bind.toml"), line: 3 };
        let catalog = Catalog::standard()
            .with_severity(RuleId::BindingObjectArgsCountNotOne, Severity::Warning);
        let report = |id: RuleId, argument: &str| {
            return catalog.diagnostic(id, location.clone(), vec![argument.to_string()]).unwrap();
        };
        return vec![
            report(RuleId::TargetNotElement, "label"),
            report(RuleId::BindingObjectArgsCountNotOne, "2"),
        ];
    }

    #[test]
    fn human_lines_carry_location_and_code() {
        let text = render_human(&sample());
        assert!(
            text.starts_with("main.bind.toml:3:7: error[BND0001]: Target 'label' is not an element.\n")
        );
        assert!(text.contains("warning[BND0009]"));
    }

    #[test]
    fn json_rows_are_flat_objects() {
        let rendered = render_json(&sample()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let first = json.get(0).unwrap();
        assert_eq!(first.get("code").unwrap(), "BND0001");
        assert_eq!(first.get("severity").unwrap(), "error");
        assert_eq!(first.get("line").unwrap(), 3);
    }

    #[test]
    fn summary_counts_by_severity() {
        assert_eq!(render_summary(Counts::of(&sample()), 0), "1 error, 1 warning");
        assert_eq!(render_summary(Counts::default(), 2), "No binding problems (2 baselined)");
    }

    #[test]
    fn unknown_rule_lists_codes() {
        let md = render_error(&Error::UnknownRule { code: "BND0042".to_string() });
        assert!(md.contains("# Error: Unknown Rule"));
        assert!(md.contains("- `BND0011`"));
    }
}

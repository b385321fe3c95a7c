//! Core CLI commands for bindcheck: check, baseline, rules, suppress.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;

use crate::baseline::{BASELINE_FILE, Baseline};
use crate::catalog::{Diagnostic, RuleId, Severity};
use crate::config::{CONFIG_FILE, Config};
use crate::diagnostics::{self, Counts, Format};
use crate::engine::{default_workers, validate_all};
use crate::error::Error;
use crate::model::Model;
use crate::scanner;
use crate::validate::Context;

/// Write every current diagnostic to `.bindcheck.baseline`, accepting them.
///
/// # Errors
///
/// Returns errors from config loading, model loading, or baseline writing.
pub fn baseline() -> Result<(), Error> {
    let root = PathBuf::from(".");
    let diagnostics = project_diagnostics(&root)?;
    let baseline = Baseline::from_diagnostics(&diagnostics);
    baseline.write(&root.join(BASELINE_FILE))?;
    let count = baseline.entries.len();
    println!("Wrote {count} diagnostics to {BASELINE_FILE}");
    return Ok(());
}

/// Validate every binding site in the project and print what is not baselined.
///
/// # Errors
///
/// Returns errors from config, model, or baseline loading.
pub fn check(format: Format) -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");
    let diagnostics = project_diagnostics(&root)?;
    let baseline = Baseline::read(&root.join(BASELINE_FILE))?;
    let (remaining, hidden) = baseline.filter(diagnostics);
    let counts = Counts::of(&remaining);
    let summary = diagnostics::render_summary(counts, hidden);

    match format {
        Format::Human => {
            print!("{}", diagnostics::render_human(&remaining));
            if !remaining.is_empty() {
                println!();
            }
            println!("{summary}");
        },
        Format::Json => {
            println!("{}", diagnostics::render_json(&remaining)?);
            eprintln!("{summary}");
        },
    }

    // Exit code priority: error (2) > warning or info (1) > clean (0).
    if counts.errors > 0 {
        return Ok(ExitCode::from(2));
    } else if remaining.is_empty() {
        return Ok(ExitCode::SUCCESS);
    } else {
        return Ok(ExitCode::from(1));
    }
}

/// Load the project under `root` and validate every site.
///
/// # Errors
///
/// Returns errors from config loading or model loading.
pub fn project_diagnostics(root: &Path) -> Result<Vec<Diagnostic>, Error> {
    let config = Config::load(root)?;
    let files = scanner::scan(root, &config);
    let model = Model::load(root, &files)?;
    let catalog = config.catalog();
    let framework = config.framework();
    let ctx = Context {
        catalog: &catalog,
        framework: &framework,
        resolver: &model.graph,
    };
    let workers = config.workers().unwrap_or_else(default_workers);
    tracing::info!(files = files.len(), sites = model.sites.len(), workers, "checking project");
    return Ok(validate_all(&model.sites, &ctx, workers));
}

// ── Rule listing ──────────────────────────────────────────────────────

/// JSON shape of one catalog rule.
#[derive(Serialize)]
struct RuleJson {
    category: &'static str,
    code: &'static str,
    enabled: bool,
    message: &'static str,
    severity: Severity,
    title: &'static str,
}

/// Print the rule catalog with this project's severities applied.
///
/// # Errors
///
/// Returns errors from config loading or JSON serialization.
pub fn rules(json: bool) -> Result<(), Error> {
    let config = Config::load(Path::new("."))?;
    let catalog = config.catalog();

    if json {
        let rows: Vec<RuleJson> = catalog
            .rules()
            .iter()
            .map(|rule| {
                return RuleJson {
                    category: rule.category,
                    code: rule.id.code(),
                    enabled: rule.enabled,
                    message: rule.message,
                    severity: rule.severity,
                    title: rule.title,
                };
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("| Code | Severity | Message |");
    println!("|------|----------|---------|");
    for rule in catalog.rules() {
        let severity = if rule.enabled { rule.severity.to_string() } else { "off".to_string() };
        println!("| {} | {severity} | {} |", rule.id, rule.message);
    }
    return Ok(());
}

// ── Config file editing ───────────────────────────────────────────────

/// Disable a rule by adding its code to `disabled` in `.bindcheck.toml`.
/// Comments and formatting in the file are preserved.
///
/// # Errors
///
/// Returns `Error::UnknownRule` for a code not in the catalog,
/// `Error::ParseFailed` if the config can't be parsed, or `Error::Io`.
pub fn suppress(code: &str) -> Result<(), Error> {
    let id = RuleId::from_code(code).ok_or_else(|| {
        return Error::UnknownRule {
            code: code.to_string(),
        };
    })?;
    let root = PathBuf::from(".");
    let (config_path, mut doc) = read_config_doc(&root)?;

    if !doc.contains_key("disabled") {
        doc["disabled"] = toml_edit::value(toml_edit::Array::new());
    }
    let Some(disabled) = doc["disabled"].as_array_mut() else {
        return Err(Error::ParseFailed {
            file: config_path,
            reason: "`disabled` must be an array of rule codes".to_string(),
        });
    };

    let already = disabled
        .iter()
        .any(|v| return v.as_str().and_then(RuleId::from_code) == Some(id));
    if already {
        println!("{id} is already disabled");
        return Ok(());
    }
    disabled.push(id.code());

    std::fs::write(&config_path, doc.to_string())?;
    println!("Disabled {id} in {CONFIG_FILE}");
    return Ok(());
}

/// Parse `.bindcheck.toml` into a format-preserving document.
/// Returns an empty document if the file doesn't exist.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::ParseFailed` on parse failure.
fn read_config_doc(root: &Path) -> Result<(PathBuf, toml_edit::DocumentMut), Error> {
    let config_path = root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::Io(e)),
    };

    let doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        return Error::ParseFailed {
            file: config_path.clone(),
            reason: e.to_string(),
        };
    })?;

    return Ok((config_path, doc));
}

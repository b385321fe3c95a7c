//! Baseline persistence: accepted diagnostics that `check` no longer reports.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::catalog::{Diagnostic, RuleId};
use crate::error::Error;

/// Name of the baseline file at the project root.
pub const BASELINE_FILE: &str = ".bindcheck.baseline";

/// A single accepted diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BaselineEntry {
    /// The model file the diagnostic was reported in.
    pub file: PathBuf,
    /// SHA-256 of rule code, file, and rendered message.
    pub fingerprint: String,
    /// The rule that fired.
    pub rule: RuleId,
}

impl BaselineEntry {
    /// Entry accepting `diagnostic`.
    pub fn of(diagnostic: &Diagnostic) -> Self {
        return Self {
            file: diagnostic.location.file.clone(),
            fingerprint: fingerprint(diagnostic),
            rule: diagnostic.rule,
        };
    }
}

impl Ord for BaselineEntry {
    /// Compare entries by (file, rule code, fingerprint) for deterministic ordering.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        return (&self.file, self.rule.code(), &self.fingerprint).cmp(&(
            &other.file,
            other.rule.code(),
            &other.fingerprint,
        ));
    }
}

impl PartialOrd for BaselineEntry {
    /// Delegate to `Ord` implementation.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        return Some(self.cmp(other));
    }
}

/// The baseline as a whole. Entries are sorted by (file, rule, fingerprint)
/// when built through `Baseline::new()` or checked by `Baseline::parse()`.
/// Code that edits `entries` directly owns keeping that order.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Baseline {
    /// The ordered list of accepted diagnostics.
    #[serde(default)]
    pub entries: Vec<BaselineEntry>,
}

impl Baseline {
    /// Split `diagnostics` into those still reported and the number hidden
    /// by this baseline.
    pub fn filter(&self, diagnostics: Vec<Diagnostic>) -> (Vec<Diagnostic>, usize) {
        let accepted: HashSet<&BaselineEntry> = self.entries.iter().collect();
        let total = diagnostics.len();
        let remaining: Vec<Diagnostic> = diagnostics
            .into_iter()
            .filter(|d| return !accepted.contains(&BaselineEntry::of(d)))
            .collect();
        let hidden = total.saturating_sub(remaining.len());
        return (remaining, hidden);
    }

    /// Baseline accepting every diagnostic given. Sorts and deduplicates.
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        return Self::new(diagnostics.iter().map(BaselineEntry::of).collect());
    }

    /// Create a new baseline from unsorted entries. Sorts and deduplicates.
    pub fn new(mut entries: Vec<BaselineEntry>) -> Self {
        entries.sort();
        entries.dedup();
        return Self { entries };
    }

    /// Parse a baseline from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseFailed` if the content is not valid TOML,
    /// or `Error::BaselineCorrupt` if entries are not strictly sorted.
    pub fn parse(content: &str, path: &Path) -> Result<Self, Error> {
        let baseline: Self = toml::from_str(content).map_err(|e| {
            return Error::ParseFailed {
                file: path.to_path_buf(),
                reason: e.to_string(),
            };
        })?;
        enforce_baseline_entry_ordering(&baseline.entries)?;
        return Ok(baseline);
    }

    /// Read and parse a baseline from disk. A missing file is an empty baseline.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` for read failures other than not-found, or any
    /// error from [`Baseline::parse`].
    pub fn read(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content, path);
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlSer` if serialization fails.
    pub fn serialize(&self) -> Result<String, Error> {
        return Ok(toml::to_string_pretty(self)?);
    }

    /// Write the baseline to disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlSer` if serialization fails,
    /// or `Error::Io` if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let content = self.serialize()?;
        std::fs::write(path, content)?;
        return Ok(());
    }
}

/// Validate that baseline entries are strictly sorted.
///
/// # Errors
///
/// Returns `Error::BaselineCorrupt` if any adjacent pair is out of order or repeated.
fn enforce_baseline_entry_ordering(entries: &[BaselineEntry]) -> Result<(), Error> {
    for (first, second) in entries.iter().zip(entries.iter().skip(1)) {
        if first >= second {
            return Err(Error::BaselineCorrupt {
                reason: format!(
                    "entries not sorted: {} {} {} >= {} {} {}",
                    first.file.display(),
                    first.rule,
                    first.fingerprint,
                    second.file.display(),
                    second.rule,
                    second.fingerprint,
                ),
            });
        }
    }
    return Ok(());
}

/// Line-independent identity of a diagnostic.
fn fingerprint(diagnostic: &Diagnostic) -> String {
    let mut hasher = Sha256::new();
    hasher.update(diagnostic.rule.code().as_bytes());
    hasher.update([0]);
    hasher.update(diagnostic.location.file.to_string_lossy().as_bytes());
    hasher.update([0]);
    hasher.update(diagnostic.message().as_bytes());
    let hash = hasher.finalize();
    return format!("{hash:x}");
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests unwrap freely")]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::Location;

    fn diagnostic(line: u32, value: &str) -> Diagnostic {
        let location = Location { column: 3, file: PathBuf::from("views/main.bind.toml"), line };
        return Catalog::standard()
            .diagnostic(
                RuleId::PropertyToTargetWithoutConverter,
                location,
                vec!["int".to_string(), value.to_string()],
            )
            .unwrap();
    }

    #[test]
    fn fingerprints_ignore_line_numbers() {
        let baseline = Baseline::from_diagnostics(&[diagnostic(4, "string")]);
        let later = vec![diagnostic(40, "string"), diagnostic(41, "bool")];
        let (remaining, hidden) = baseline.filter(later);
        assert_eq!(hidden, 1);
        assert_eq!(remaining.len(), 1);
        assert!(remaining.first().unwrap().message().contains("bool"));
    }

    #[test]
    fn serialized_baseline_parses_back() {
        let baseline = Baseline::from_diagnostics(&[
            diagnostic(1, "string"),
            diagnostic(2, "bool"),
            diagnostic(1, "string"),
        ]);
        assert_eq!(baseline.entries.len(), 2);
        let text = baseline.serialize().unwrap();
        assert!(text.contains("rule = \"BND0004\""));
        let parsed = Baseline::parse(&text, Path::new(BASELINE_FILE)).unwrap();
        assert_eq!(parsed.entries, baseline.entries);
    }

    #[test]
    fn rejects_unsorted_entries() {
        let mut baseline =
            Baseline::from_diagnostics(&[diagnostic(1, "string"), diagnostic(2, "bool")]);
        baseline.entries.reverse();
        let text = baseline.serialize().unwrap();
        let err = Baseline::parse(&text, Path::new(BASELINE_FILE)).unwrap_err();
        assert!(matches!(err, Error::BaselineCorrupt { .. }));
    }
}

/// Crate-level error types for bindcheck host operations.
///
/// Binding problems are never errors: they are reported as
/// [`crate::catalog::Diagnostic`]s. These variants cover the host around
/// the validators: model files, configuration, baselines, and the watcher.
use std::path::PathBuf;

/// All errors in bindcheck carry enough context to produce a useful report
/// without a debugger. Each variant names the file, rule, or reason for failure.
#[allow(
    clippy::error_impl_error,
    reason = "crate-internal error type shared by library and binary"
)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Baseline exists but its entries are malformed or out of order.
    #[error("baseline corrupt: {reason}")]
    BaselineCorrupt {
        /// Description of the corruption.
        reason: String,
    },

    /// Two declarations share a name and arity.
    #[error("duplicate type `{name}` with {arity} type parameter(s) in {}", file.display())]
    DuplicateType {
        /// Number of generic parameters of the clashing declarations.
        arity: usize,
        /// Model file containing the second declaration.
        file: PathBuf,
        /// Qualified type name.
        name: String,
    },

    /// A `[[sites]]` entry cannot be turned into a binding site.
    #[error("invalid site at {}:{line}: {reason}", file.display())]
    InvalidSite {
        /// Model file containing the site.
        file: PathBuf,
        /// Line the site declares.
        line: u32,
        /// What is wrong with it.
        reason: String,
    },

    /// A type expression does not parse.
    #[error("invalid type expression `{expr}`: {reason}")]
    InvalidTypeExpression {
        /// The offending text.
        expr: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A TOML document (model, config, or baseline) failed to parse.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A built-in pattern failed to compile.
    #[error("pattern: {0}")]
    Pattern(
        /// The wrapped regex error.
        #[from]
        regex::Error,
    ),

    /// TOML serialization failed.
    #[error("toml serialize: {0}")]
    TomlSer(
        /// The wrapped TOML serialization error.
        #[from]
        toml::ser::Error,
    ),

    /// A rule code in configuration or on the command line is not in the catalog.
    #[error("unknown rule: `{code}`")]
    UnknownRule {
        /// The code as written.
        code: String,
    },

    /// The filesystem watcher could not be set up.
    #[error("watch: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}

//! Tracing setup for the binary.
//!
//! The subscriber is only installed when `BINDCHECK_LOG` (or `RUST_LOG`) is
//! set, so normal runs pay nothing. Output goes to stderr and never mixes
//! with diagnostics on stdout.
//!
//! ```bash
//! BINDCHECK_LOG=debug bindcheck check
//! BINDCHECK_LOG="bindcheck::validate=trace" bindcheck check --format json
//! ```

use tracing_subscriber::EnvFilter;

/// Environment variable read before `RUST_LOG`.
const LOG_ENV: &str = "BINDCHECK_LOG";

/// Build an `EnvFilter` from `BINDCHECK_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_ENV) {
        return EnvFilter::builder().parse_lossy(val);
    }
    return EnvFilter::from_default_env();
}

/// Initialise the global tracing subscriber, if logging was requested.
pub fn init_tracing() {
    let requested = std::env::var_os(LOG_ENV).is_some() || std::env::var_os("RUST_LOG").is_some();
    if !requested {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

//! Parallel validation of every site in a project.

use std::num::NonZeroUsize;

use crate::catalog::Diagnostic;
use crate::types::BindingSite;
use crate::validate::{Context, validate_into};

/// Default worker count: the machine's available parallelism.
pub fn default_workers() -> usize {
    return std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
}

/// Deterministic report order: location, then rule code, then message.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        return a
            .location
            .cmp(&b.location)
            .then_with(|| return a.rule.code().cmp(b.rule.code()))
            .then_with(|| return a.message().cmp(&b.message()));
    });
}

/// Validate `sites` on a pool of `workers` threads and return every
/// diagnostic, sorted by location, then rule code.
///
/// Validators share nothing but the read-only context, so the result is the
/// same for any worker count. Each task reports through its own clone of a
/// channel sender; the receiver is drained once the pool is done.
pub fn validate_all(sites: &[BindingSite], ctx: &Context<'_>, workers: usize) -> Vec<Diagnostic> {
    let (tx, rx) = crossbeam_channel::unbounded::<Diagnostic>();
    let workers = workers.clamp(1, sites.len().max(1));
    tracing::debug!(sites = sites.len(), workers, "validating");

    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.scope(|scope| {
            for site in sites {
                let mut sink = tx.clone();
                scope.spawn(move |_| validate_into(site, ctx, &mut sink));
            }
        }),
        Err(e) => {
            tracing::warn!(error = %e, "thread pool unavailable, validating serially");
            let mut sink = tx.clone();
            for site in sites {
                validate_into(site, ctx, &mut sink);
            }
        },
    }
    drop(tx);

    let mut diagnostics: Vec<Diagnostic> = rx.into_iter().collect();
    sort_diagnostics(&mut diagnostics);
    return diagnostics;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests unwrap freely")]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::catalog::{Catalog, RuleId};
    use crate::types::Location;

    #[test]
    fn sorts_by_location_then_code() {
        let catalog = Catalog::standard();
        let report = |id: RuleId, line: u32, argument: &str| {
            let location = Location {
                column: 1,
                file: PathBuf::from("a.bind.toml"),
                line,
            };
            return catalog.diagnostic(id, location, vec![argument.to_string()]).unwrap();
        };
        let mut diagnostics = vec![
            report(RuleId::BindingObjectArgsCountNotOne, 2, "0"),
            report(RuleId::BindingObjectArgsCountNotOne, 1, "0"),
            report(RuleId::BindingObjectNotObservableObject, 1, "Foo"),
        ];
        sort_diagnostics(&mut diagnostics);
        let order: Vec<(u32, &str)> = diagnostics
            .iter()
            .map(|d| return (d.location.line, d.rule.code()))
            .collect();
        assert_eq!(order, vec![(1, "BND0008"), (1, "BND0009"), (2, "BND0009")]);
    }
}

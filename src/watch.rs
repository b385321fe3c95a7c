//! File watcher: runs `check` on startup, then re-runs on model changes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands;
use crate::config::CONFIG_FILE;
use crate::diagnostics::{Format, print_error};
use crate::error::Error;
use crate::scanner;

/// Debounce delay between filesystem events and re-check.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that sends an event for each relevant change.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(tx: crossbeam_channel::Sender<()>) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
            && event.paths.iter().any(|p| return is_relevant(p))
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Model files and the project config trigger a re-check; nothing else does.
fn is_relevant(path: &Path) -> bool {
    return scanner::is_model_file(path)
        || path.file_name().is_some_and(|name| return name == CONFIG_FILE);
}

/// Entry point for the watch command.
///
/// Runs an initial check, then watches the project tree and re-checks on changes.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be set up.
pub fn run(format: Format) -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");

    eprintln!("watch: initial check");
    let mut last_code = run_check(format);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher.watch(&root, RecursiveMode::Recursive).map_err(|e| {
        return Error::Watch {
            reason: format!("cannot watch {}: {e}", root.display()),
        };
    })?;

    eprintln!("watch: monitoring model files, press Ctrl+C to stop");

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        eprintln!("watch: change detected, re-checking...");
        last_code = run_check(format);
    }

    return Ok(last_code);
}

/// Run check once and print result. Returns the exit code from check.
fn run_check(format: Format) -> ExitCode {
    return match commands::check(format) {
        Ok(code) => code,
        Err(e) => {
            print_error(&e);
            ExitCode::from(3_u8)
        },
    };
}

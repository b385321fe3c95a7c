use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::Config;

/// Suffix identifying binding model files.
pub const MODEL_SUFFIX: &str = ".bind.toml";

/// Find every model file under `root` that the config's include/exclude
/// filters allow. Paths are relative to `root` and sorted, so diagnostics
/// come out in the same order on every run.
pub fn scan(root: &Path, config: &Config) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| return e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file() && is_model_file(e.path()))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(root).unwrap_or(e.path()).to_path_buf();
            let relative_str = slash_path(&relative);
            if !config.should_scan(&relative_str) {
                tracing::trace!(path = %relative_str, "excluded by config");
                return None;
            }
            return Some(relative);
        })
        .collect();
    files.sort();
    return files;
}

/// Whether `path` names a binding model file.
pub fn is_model_file(path: &Path) -> bool {
    return path
        .file_name()
        .is_some_and(|name| return name.to_string_lossy().ends_with(MODEL_SUFFIX));
}

/// Dot-directories such as `.git` are never scanned.
fn is_hidden(entry: &DirEntry) -> bool {
    return entry.file_name().to_string_lossy().starts_with('.');
}

/// Forward-slash rendering used for prefix matching on every platform.
fn slash_path(path: &Path) -> String {
    return path
        .components()
        .map(|c| return c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests unwrap freely")]
mod tests {
    use super::*;

    #[test]
    fn finds_model_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("views/legacy")).unwrap();
        std::fs::create_dir_all(root.join(".cache")).unwrap();
        std::fs::write(root.join("views/b.bind.toml"), "").unwrap();
        std::fs::write(root.join("views/a.bind.toml"), "").unwrap();
        std::fs::write(root.join("views/legacy/old.bind.toml"), "").unwrap();
        std::fs::write(root.join("views/notes.toml"), "").unwrap();
        std::fs::write(root.join(".cache/c.bind.toml"), "").unwrap();

        let config =
            Config::parse("exclude = [\"views/legacy/\"]\n", Path::new(".bindcheck.toml")).unwrap();
        let files = scan(root, &config);
        assert_eq!(
            files,
            vec![PathBuf::from("views/a.bind.toml"), PathBuf::from("views/b.bind.toml")]
        );
    }
}

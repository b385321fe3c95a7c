use std::path::Path;
use std::process::{Command, Output};

const VIEWS: &str = r#"
[elements]
title = "App.Title"

[[types]]
name = "App.Title"
base = "Ui.Element"
[types.members]
Text = "Ui.Bindable.BindableProperty<string>"

[[types]]
name = "App.MainViewModel"
base = "Ui.Bindable.ObservableObject"

[[sites]]
tag = "Binding"
kind = "class"
name = "MainViewModel"
type = "App.MainViewModel"
arguments = ["\"main\""]
line = 1

[[sites]]
tag = "Binding"
kind = "property"
name = "Heading"
type = "string"
arguments = ["nameof(title.Text)"]
line = 4
column = 5
"#;

const BROKEN: &str = r#"
[elements]
title = "App.Title"

[[sites]]
tag = "Binding"
kind = "property"
name = "Count"
type = "int"
arguments = ["nameof(title.Text)"]
line = 7
column = 5
"#;

fn bindcheck(root: &Path, args: &[&str]) -> Output {
    return Command::new(env!("CARGO_BIN_EXE_bindcheck"))
        .current_dir(root)
        .args(args)
        .output()
        .unwrap();
}

fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    return dir;
}

fn stdout(output: &Output) -> String {
    return String::from_utf8_lossy(&output.stdout).into_owned();
}

#[test]
fn clean_project_exits_zero() {
    let dir = project(&[("views/main.bind.toml", VIEWS)]);
    let check = bindcheck(dir.path(), &["check"]);
    assert_eq!(check.status.code(), Some(0), "{}", String::from_utf8_lossy(&check.stderr));
    assert!(stdout(&check).contains("No binding problems"));
}

#[test]
fn binding_errors_exit_two_with_locations() {
    // The broken file reuses the element type declared by views/main.bind.toml.
    let dir = project(&[("views/main.bind.toml", VIEWS), ("views/broken.bind.toml", BROKEN)]);
    let check = bindcheck(dir.path(), &["check"]);
    assert_eq!(check.status.code(), Some(2));
    let out = stdout(&check);
    assert!(out.contains("views/broken.bind.toml:7:5: error[BND0004]"), "{out}");
    assert!(out.contains("1 error"));
}

#[test]
fn json_output_is_machine_readable() {
    let dir = project(&[("views/main.bind.toml", VIEWS), ("views/broken.bind.toml", BROKEN)]);
    let check = bindcheck(dir.path(), &["check", "--format", "json"]);
    assert_eq!(check.status.code(), Some(2));
    let json: serde_json::Value = serde_json::from_str(&stdout(&check)).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    let row = rows.first().unwrap();
    assert_eq!(row.get("code").unwrap(), "BND0004");
    assert_eq!(row.get("line").unwrap(), 7);
}

#[test]
fn warnings_only_exit_one() {
    let dir = project(&[
        ("views/main.bind.toml", VIEWS),
        ("views/broken.bind.toml", BROKEN),
        (".bindcheck.toml", "[severity]\nBND0004 = \"warning\"\n"),
    ]);
    let check = bindcheck(dir.path(), &["check"]);
    assert_eq!(check.status.code(), Some(1));
    assert!(stdout(&check).contains("warning[BND0004]"));
}

#[test]
fn baseline_hides_accepted_diagnostics() {
    let dir = project(&[("views/main.bind.toml", VIEWS), ("views/broken.bind.toml", BROKEN)]);
    let baseline = bindcheck(dir.path(), &["baseline"]);
    assert!(baseline.status.success(), "{}", String::from_utf8_lossy(&baseline.stderr));
    assert!(dir.path().join(".bindcheck.baseline").exists());

    let check = bindcheck(dir.path(), &["check"]);
    assert_eq!(check.status.code(), Some(0));
    assert!(stdout(&check).contains("(1 baselined)"));
}

#[test]
fn suppress_preserves_existing_config() {
    let config = "# project settings\nexclude = [\"legacy/\"]\n";
    let dir = project(&[
        ("views/main.bind.toml", VIEWS),
        ("views/broken.bind.toml", BROKEN),
        (".bindcheck.toml", config),
    ]);
    let suppress = bindcheck(dir.path(), &["suppress", "bnd0004"]);
    assert!(suppress.status.success(), "{}", String::from_utf8_lossy(&suppress.stderr));

    let written = std::fs::read_to_string(dir.path().join(".bindcheck.toml")).unwrap();
    assert!(written.starts_with("# project settings\n"));
    assert!(written.contains("\"BND0004\""));

    let check = bindcheck(dir.path(), &["check"]);
    assert_eq!(check.status.code(), Some(0));
}

#[test]
fn unknown_rule_is_a_host_failure() {
    let dir = project(&[]);
    let suppress = bindcheck(dir.path(), &["suppress", "BND4242"]);
    assert_eq!(suppress.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&suppress.stderr).contains("Unknown Rule"));
}

#[test]
fn malformed_model_is_a_host_failure() {
    let dir = project(&[("views/main.bind.toml", "[[sites]]\ntag = 3\n")]);
    let check = bindcheck(dir.path(), &["check"]);
    assert_eq!(check.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&check.stderr).contains("Parse Failed"));
}

#[test]
fn rules_lists_the_catalog() {
    let dir = project(&[(".bindcheck.toml", "disabled = [\"BND0009\"]\n")]);
    let rules = bindcheck(dir.path(), &["rules", "--json"]);
    assert!(rules.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&rules)).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 11);
    let args_count = rows.iter().find(|r| return r.get("code").unwrap() == "BND0009").unwrap();
    assert_eq!(args_count.get("enabled").unwrap(), false);
}

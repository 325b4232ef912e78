// tests/cli_tests.rs
// End-to-end tests for the rlu-complete binary with stub helper scripts

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn scripts_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("list_entry_ids.sh"),
        "printf 'abc123\\nabd456\\n'\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("fetch_entry_ids.sh"),
        "echo \"e-$1 Standup notes\"\necho \"f-$1\"\n",
    )
    .unwrap();
    fs::write(dir.path().join("completions.yaml"), "interpreter: sh\ntimeout_ms: 5000\n").unwrap();
    dir
}

fn rlu_complete(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rlu-complete").expect("rlu-complete binary must be built");
    cmd.env_remove("RLU_SCRIPTS_DIR")
        .env_remove("RLU_INTERPRETER")
        .env_remove("RLU_COMPLETION_TIMEOUT_MS")
        .arg("--config")
        .arg(dir.join("completions.yaml"))
        .arg("--scripts-dir")
        .arg(dir);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().clone();
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[cfg(unix)]
#[test]
fn suggests_entry_ids_as_lines() {
    let dir = scripts_dir();
    let out = stdout_of(
        rlu_complete(dir.path()).args(["suggest", "--", "delete", "--entry-id", ""]),
    );
    assert_eq!(out, "abc123\tabc123\tEntry ID\nabd456\tabd456\tEntry ID\n");
}

#[cfg(unix)]
#[test]
fn suggests_entries_for_typed_date_as_json() {
    let dir = scripts_dir();
    let out = stdout_of(rlu_complete(dir.path()).args([
        "suggest",
        "--json",
        "--",
        "output-content",
        "--date",
        "2024-03-01",
        "--entry-id",
        "",
    ]));

    let json: Value = serde_json::from_str(out.trim()).expect("JSON array");
    assert_eq!(
        json,
        serde_json::json!([
            { "name": "Standup notes", "description": "e-2024-03-01", "insertValue": "e-2024-03-01" },
            { "name": "Entry ID", "description": "f-2024-03-01", "insertValue": "f-2024-03-01" }
        ])
    );
}

#[test]
fn missing_scripts_print_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("completions.yaml"), "timeout_ms: 300\n").unwrap();
    let out = stdout_of(
        rlu_complete(dir.path()).args(["suggest", "--", "add-to-start", "--entry-id", ""]),
    );
    assert_eq!(out, "");
}

#[test]
fn suggests_subcommands() {
    let dir = scripts_dir();
    let out = stdout_of(rlu_complete(dir.path()).args(["suggest", "--", "sh"]));
    assert_eq!(out, "show\tshow\tShow journal entries for a specific date\n");
}

#[test]
fn prints_spec_tree() {
    let dir = scripts_dir();
    let out = stdout_of(rlu_complete(dir.path()).arg("spec"));
    let json: Value = serde_json::from_str(&out).expect("spec JSON");

    let subcommands: Vec<&str> = json["subcommands"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(
        subcommands,
        ["output-content", "show", "add", "add-to-start", "append-to-end", "add-child-node", "delete"]
    );
    assert_eq!(json["options"][0]["name"], "--help");
    assert!(json["options"][0].get("args").is_none());
}

#[test]
fn invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("completions.yaml"), "timeout_ms: [1, 2]\n").unwrap();
    rlu_complete(dir.path())
        .args(["suggest", "--", "show", "--date", ""])
        .assert()
        .failure();
}

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Command with --no-color, a private database and no user config
fn atlas_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("atlas").expect("Failed to find atlas binary");
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--no-color")
        .arg("--database-file")
        .arg(temp_dir.path().join("cli_test.db"));
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.arg("--json").output().expect("Failed to run atlas");
    assert!(
        output.status.success(),
        "atlas failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn start_plan(temp_dir: &TempDir, goal: &str) -> String {
    let body = json_output(atlas_cmd(temp_dir).args(["start", goal, "--user", "user-1"]));
    body["plan_id"].as_str().expect("plan_id").to_string()
}

#[test]
fn test_cli_start_plan_success() {
    let temp_dir = create_cli_test_environment();

    atlas_cmd(&temp_dir)
        .args(["start", "5-day Paris trip, $3000 budget", "--user", "user-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started plan with ID:"))
        .stdout(predicate::str::contains("5-day Paris trip"))
        .stdout(predicate::str::contains("## Flights"));
}

#[test]
fn test_cli_start_json_shape() {
    let temp_dir = create_cli_test_environment();

    let body = json_output(atlas_cmd(&temp_dir).args(["start", "5-day Paris trip, $3000 budget"]));
    assert_eq!(body["status"], "in_progress");
    assert!(body["plan_id"].is_string());
    assert!(body["message"].is_string());
}

#[test]
fn test_cli_full_conversation() {
    let temp_dir = create_cli_test_environment();
    let plan_id = start_plan(&temp_dir, "5-day Paris trip");

    let body = json_output(atlas_cmd(&temp_dir).args(["status", &plan_id]));
    assert_eq!(body["status"], "awaiting_user_input");

    let body = json_output(atlas_cmd(&temp_dir).args(["continue", &plan_id, "$3000 budget"]));
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["contributions"]["budget"]["turn"], 1);

    atlas_cmd(&temp_dir)
        .args(["finalize", &plan_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finalized plan"))
        .stdout(predicate::str::contains("Estimated total: $"))
        .stdout(predicate::str::contains("Arrive in Paris"));

    let body = json_output(atlas_cmd(&temp_dir).args(["status", &plan_id]));
    assert_eq!(body["status"], "completed");
    assert!(body["plan"]["completed_at"].is_string());
}

#[test]
fn test_cli_continue_completed_plan_is_rejected() {
    let temp_dir = create_cli_test_environment();
    let plan_id = start_plan(&temp_dir, "5-day Paris trip, $3000 budget");

    atlas_cmd(&temp_dir)
        .args(["finalize", &plan_id])
        .assert()
        .success();

    atlas_cmd(&temp_dir)
        .args(["continue", &plan_id, "one more museum"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Rejected:"))
        .stderr(predicate::str::contains("completed"));
}

#[test]
fn test_cli_unknown_plan() {
    let temp_dir = create_cli_test_environment();

    atlas_cmd(&temp_dir)
        .args(["status", "no-such-plan"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Plan no-such-plan not found"));
}

#[test]
fn test_cli_empty_goal_is_rejected() {
    let temp_dir = create_cli_test_environment();

    atlas_cmd(&temp_dir)
        .args(["start", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("goal"));
}

#[test]
fn test_cli_ephemeral_leaves_no_database() {
    let temp_dir = create_cli_test_environment();

    Command::cargo_bin("atlas")
        .unwrap()
        .env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env("XDG_DATA_HOME", temp_dir.path().join("data"))
        .args(["--no-color", "--ephemeral", "start", "Weekend in Rome"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started plan with ID:"));

    assert!(!temp_dir.path().join("data").join("atlas").exists());
}

#[test]
fn test_cli_config_file() {
    let temp_dir = create_cli_test_environment();
    let config = temp_dir.path().join("atlas.yaml");
    write_file(&config, "write_attempts: 0\n");

    atlas_cmd(&temp_dir)
        .arg("--config")
        .arg(&config)
        .args(["start", "5-day Paris trip"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("write_attempts"));

    write_file(&config, "specialist_attempts: 1\ntimeouts_ms:\n  flights: 5000\n");
    atlas_cmd(&temp_dir)
        .arg("--config")
        .arg(&config)
        .args(["start", "5-day Paris trip, $3000 budget"])
        .assert()
        .success();
}

#[test]
fn test_cli_help_lists_commands() {
    Command::cargo_bin("atlas")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("continue"))
        .stdout(predicate::str::contains("finalize"))
        .stdout(predicate::str::contains("serve"));
}

fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).expect("Failed to write file");
}

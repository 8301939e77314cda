//! Integration tests comparing CLI output with the core Display
//! implementations the MCP server and library callers see.

use std::process::Command;

use atlas_core::{
    params::{PlanRef, StartPlan},
    FinalizeResult, Orchestrator, OrchestratorBuilder, StatusResponse,
};
use tempfile::TempDir;

/// Helper function to create a test orchestrator with temporary database
async fn create_test_orchestrator() -> (Orchestrator, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test.db");

    let orchestrator = OrchestratorBuilder::new()
        .with_database_path(Some(db_path))
        .build()
        .await
        .expect("Failed to create orchestrator");

    (orchestrator, temp_dir)
}

/// Run a CLI command against the test database and capture its output
fn run_cli_command(temp_dir: &TempDir, args: &[&str]) -> String {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_atlas"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--no-color")
        .arg("--database-file")
        .arg(temp_dir.path().join("test.db"));

    for arg in args {
        cmd.arg(arg);
    }

    let output = cmd.output().expect("Failed to run CLI command");
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

async fn start(orchestrator: &Orchestrator, goal: &str) -> String {
    orchestrator
        .start(&StartPlan {
            goal: goal.to_string(),
            user_id: "user-1".to_string(),
        })
        .await
        .expect("Failed to start plan")
        .plan_id
        .to_string()
}

#[tokio::test]
async fn test_status_output_matches_display() {
    let (orchestrator, temp_dir) = create_test_orchestrator().await;
    let plan_id = start(&orchestrator, "5-day Paris trip, $3000 budget").await;

    let plan = orchestrator
        .status(&PlanRef {
            plan_id: plan_id.clone(),
        })
        .await
        .unwrap();

    let cli_output = run_cli_command(&temp_dir, &["status", &plan_id]);
    assert_eq!(cli_output, plan.to_string());
}

#[tokio::test]
async fn test_status_json_matches_response() {
    let (orchestrator, temp_dir) = create_test_orchestrator().await;
    let plan_id = start(&orchestrator, "A week in Tokyo from Boston").await;

    let plan = orchestrator
        .status(&PlanRef {
            plan_id: plan_id.clone(),
        })
        .await
        .unwrap();

    let cli_output = run_cli_command(&temp_dir, &["--json", "status", &plan_id]);
    let from_cli: StatusResponse = serde_json::from_str(&cli_output).unwrap();
    assert_eq!(from_cli, StatusResponse::from_plan(plan));
}

#[tokio::test]
async fn test_finalize_output_matches_display() {
    let (orchestrator, temp_dir) = create_test_orchestrator().await;
    let plan_id = start(&orchestrator, "4 nights in Lisbon, budget 2000 euros").await;

    let cli_output = run_cli_command(&temp_dir, &["finalize", &plan_id]);

    let plan = orchestrator
        .status(&PlanRef { plan_id })
        .await
        .unwrap();
    assert_eq!(cli_output, FinalizeResult::new(plan).to_string());
}

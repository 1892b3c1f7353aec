//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a temporary data directory and
//! verify its JSON output.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return output.
fn run_cli(dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_schedura"))
        .args(args)
        .env("SCHEDURA_DATA_DIR", dir.path())
        .env_remove("SCHEDURA_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(dir: &TempDir, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is JSON")
}

#[test]
fn test_task_add_uses_suggestions() {
    let dir = TempDir::new().unwrap();
    let task = run_json(&dir, &["task", "add", "Prepare urgent client presentation"]);
    assert_eq!(task["title"], "Prepare urgent client presentation");
    assert!(task["urgency"].as_u64().unwrap() >= 4);

    let categories = run_json(&dir, &["category", "list"]);
    let work = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Work")
        .unwrap();
    assert_eq!(task["category_id"], work["id"]);
}

#[test]
fn test_task_lifecycle_awards_points() {
    let dir = TempDir::new().unwrap();
    let task = run_json(&dir, &["task", "add", "Water plants", "--importance", "2"]);
    let id = task["id"].as_str().unwrap();

    let done = run_json(&dir, &["task", "complete", id]);
    assert_eq!(done["completed"], true);
    let rewards = run_json(&dir, &["reward", "list"]);
    assert_eq!(rewards["points"], 10);

    let open = run_json(&dir, &["task", "list", "--status", "open"]);
    assert!(open.as_array().unwrap().is_empty());

    run_json(&dir, &["task", "reopen", id]);
    let rewards = run_json(&dir, &["reward", "list"]);
    assert_eq!(rewards["points"], 0);
}

#[test]
fn test_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["task", "complete", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"), "stderr: {stderr}");
}

#[test]
fn test_invalid_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&dir, &["task", "list", "--range", "2024-05-10..2024-05-01"]);
    assert_eq!(code, 1);
}

#[test]
fn test_goal_milestones() {
    let dir = TempDir::new().unwrap();
    let goal = run_json(
        &dir,
        &["goal", "add", "Run a 10k", "--milestone", "5k", "--milestone", "10k"],
    );
    let id = goal["id"].as_str().unwrap();
    let half = run_json(&dir, &["goal", "toggle", id, "1"]);
    assert_eq!(half["progress"], 50);
    let done = run_json(&dir, &["goal", "toggle", id, "2"]);
    assert_eq!(done["completed"], true);

    let (_, _, code) = run_cli(&dir, &["goal", "toggle", id, "0"]);
    assert_eq!(code, 1);
}

#[test]
fn test_habit_check_in() {
    let dir = TempDir::new().unwrap();
    let habit = run_json(&dir, &["habit", "add", "Meditate"]);
    let id = habit["id"].as_str().unwrap();
    let checked = run_json(&dir, &["habit", "check-in", id]);
    assert_eq!(checked["current_streak"], 1);

    let (_, stderr, code) = run_cli(&dir, &["habit", "check-in", id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_event_and_ics_export() {
    let dir = TempDir::new().unwrap();
    run_json(
        &dir,
        &["event", "add", "Dentist", "--start", "2024-06-03 15:00", "--minutes", "45"],
    );
    let events = run_json(&dir, &["event", "list", "--range", "2024-06-03..2024-06-03"]);
    assert_eq!(events.as_array().unwrap().len(), 1);

    let (ics, _, code) = run_cli(&dir, &["calendar", "export"]);
    assert_eq!(code, 0);
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("SUMMARY:Dentist"));
}

#[test]
fn test_ics_import() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("invite.ics");
    std::fs::write(
        &file,
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:x-1\r\nSUMMARY:Review\r\n\
         DTSTART:20240610T100000\r\nDTEND:20240610T110000\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n",
    )
    .unwrap();
    let report = run_json(&dir, &["calendar", "import", file.to_str().unwrap()]);
    assert_eq!(report["imported"], 1);
    let again = run_json(&dir, &["calendar", "import", file.to_str().unwrap()]);
    assert_eq!(again["imported"], 0);
}

#[test]
fn test_category_delete_blocked_while_used() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["category", "add", "Garden", "--color", "#22AA44"]);
    run_json(&dir, &["task", "add", "Plant tulips", "--category", "garden"]);

    let (_, stderr, code) = run_cli(&dir, &["category", "delete", "Garden"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("1 task(s)"), "stderr: {stderr}");
}

#[test]
fn test_data_import_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["task", "add", "Keep me"]);
    let backup = dir.path().join("export.json");
    let (_, _, code) = run_cli(&dir, &["data", "export", "-o", backup.to_str().unwrap()]);
    assert_eq!(code, 0);

    let (_, stderr, code) = run_cli(&dir, &["data", "import", backup.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--yes"));

    let (_, _, code) = run_cli(&dir, &["data", "import", backup.to_str().unwrap(), "--yes"]);
    assert_eq!(code, 0);
    let tasks = run_json(&dir, &["task", "list"]);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}

#[test]
fn test_stats_summary() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["task", "add", "Count me"]);
    let summary = run_json(&dir, &["stats", "summary", "--range", "all"]);
    assert_eq!(summary["tasks"]["total"], 1);
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["config", "set", "points.task", "25"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");
    let (stdout, _, _) = run_cli(&dir, &["config", "get", "points.task"]);
    assert_eq!(stdout.trim(), "25");

    let (_, _, code) = run_cli(&dir, &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_get_unset_data_file_shows_default_path() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["config", "get", "storage.data_file"]);
    assert_eq!(code, 0);
    assert_ne!(stdout.trim(), "null");
    assert!(stdout.trim().ends_with("user_data.json"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("schedura"));
}

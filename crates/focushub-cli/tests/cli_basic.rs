//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::path::Path;
use std::process::Command;

use chrono::Utc;
use focushub_core::timer::snapshot::{self, SessionSnapshot};
use focushub_core::{SessionType, SqliteStore};
use tempfile::TempDir;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_focushub"))
        .args(args)
        .env("FOCUSHUB_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn seed_snapshot(data_dir: &Path, remaining_sec: u32) {
    let store = SqliteStore::open_at(&data_dir.join("focushub.db")).unwrap();
    let snap = SessionSnapshot {
        session_type: SessionType::Work,
        remaining_sec,
        initial_duration_sec: 1500,
        cycle_index: 2,
        active_task_id: None,
        snapshot_taken_at: Utc::now(),
    };
    snapshot::save(&store, &snap).unwrap();
}

#[test]
fn test_config_list_shows_defaults() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(dir.path(), &["config", "list"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["workMinutes"], 25);
    assert_eq!(json["shortBreakMinutes"], 5);
    assert_eq!(json["longBreakMinutes"], 15);
    assert_eq!(json["sessionsBeforeLongBreak"], 4);
    assert_eq!(json["theme"], "auto");
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["config", "set", "workMinutes", "50"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "workMinutes"]).trim(), "50");

    run_ok(dir.path(), &["config", "reset"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "workMinutes"]).trim(), "25");
}

#[test]
fn test_config_rejects_out_of_range() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "workMinutes", "500"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "{stderr}");

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_stats_today_starts_empty() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(dir.path(), &["stats", "today", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["totalFocusedMinutes"], 0);
    assert_eq!(json["sessionsCount"], 0);

    let human = run_ok(dir.path(), &["stats", "today"]);
    assert!(human.contains("0m focused, 0 sessions"), "{human}");
}

#[test]
fn test_task_lifecycle() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(dir.path(), &["task", "create", "  Write docs ", "--estimate", "3"]);
    let id = out
        .lines()
        .next()
        .and_then(|l| l.strip_prefix("Task created: "))
        .expect("task id")
        .to_string();

    let list: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["task", "list"])).unwrap();
    assert_eq!(list[0]["title"], "Write docs");
    assert_eq!(list[0]["estimatedSessions"], 3);

    run_ok(dir.path(), &["task", "complete", &id]);
    let (code, _, stderr) = run_cli(dir.path(), &["task", "complete", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already completed"), "{stderr}");

    let pending: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["task", "list", "--pending"])).unwrap();
    assert_eq!(pending.as_array().map(Vec::len), Some(0));

    run_ok(dir.path(), &["task", "remove", &id]);
    let (code, _, _) = run_cli(dir.path(), &["task", "remove", &id]);
    assert_eq!(code, 1);
}

#[test]
fn test_task_create_rejects_blank_title() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["task", "create", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("empty"), "{stderr}");
}

#[test]
fn test_timer_status_idle() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(dir.path(), &["timer", "status"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["type"], "state_snapshot");
    assert_eq!(json["status"], "idle");
    assert_eq!(json["cycle_index"], 1);
}

#[test]
fn test_timer_status_shows_interrupted_session() {
    let dir = TempDir::new().unwrap();
    seed_snapshot(dir.path(), 600);

    let out = run_ok(dir.path(), &["timer", "status"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["status"], "paused");
    assert_eq!(json["remaining_sec"], 600);
    assert_eq!(json["cycle_index"], 2);

    run_ok(dir.path(), &["timer", "discard"]);
    let out = run_ok(dir.path(), &["timer", "status"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["status"], "idle");
}

#[test]
fn test_completed_session_advances_cycle_across_runs() {
    let dir = TempDir::new().unwrap();
    seed_snapshot(dir.path(), 1);

    let out = run_ok(dir.path(), &["timer", "resume"]);
    let completed: serde_json::Value = out
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .find(|e| e["type"] == "completed")
        .expect("resume should run the session to completion");
    assert_eq!(completed["cycle_index"], 3);
    assert_eq!(completed["was_completed_fully"], true);

    let out = run_ok(dir.path(), &["timer", "status"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["status"], "idle");
    assert_eq!(json["cycle_index"], 3);
}

#[test]
fn test_timer_resume_without_session_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["timer", "resume"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no interrupted session"), "{stderr}");
}

#[test]
fn test_timer_run_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["timer", "run", "--minutes", "0"]);
    assert_eq!(code, 1);

    let (code, _, stderr) = run_cli(dir.path(), &["timer", "run", "--task", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("task not found"), "{stderr}");

    let (code, _, _) = run_cli(dir.path(), &["timer", "run", "--type", "nap"]);
    assert_eq!(code, 2);
}

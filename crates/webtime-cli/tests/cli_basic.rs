//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway data
//! directory and verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Run a CLI command against `data_dir` and return (stdout, stderr, code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "webtime-cli", "--"])
        .args(args)
        .env("WEBTIME_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_stats_on_fresh_store() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["stats"]);
    assert_eq!(code, 0, "stats failed");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["total_domains"], 0);
    assert_eq!(parsed["focus_score"], 0);
}

#[test]
fn test_data_on_fresh_store() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["data"]);
    assert_eq!(code, 0, "data failed");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["domain_times"].as_object().unwrap().is_empty());
    assert_eq!(parsed["is_tracking"], true);
}

#[test]
fn test_replay_accumulates_time() {
    let dir = tempfile::tempdir().unwrap();
    let log = r#"[
        {"type": "focus_changed", "tab_id": 1, "url": "https://github.com/x", "at": "2026-03-02T09:00:00+00:00"},
        {"type": "focus_changed", "tab_id": 2, "url": "https://youtube.com/y", "at": "2026-03-02T09:02:00+00:00"},
        {"type": "tab_closed", "tab_id": 2, "at": "2026-03-02T09:02:30+00:00"}
    ]"#;
    let log_path = dir.path().join("events.json");
    let mut file = std::fs::File::create(&log_path).unwrap();
    file.write_all(log.as_bytes()).unwrap();

    let (stdout, stderr, code) = run_cli(dir.path(), &["replay", log_path.to_str().unwrap()]);
    assert_eq!(code, 0, "replay failed: {stderr}");
    assert!(stdout.contains("session_flushed"));

    let (stdout, _, code) = run_cli(dir.path(), &["data"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["domain_times"]["github.com"]["total_seconds"], 120);
    assert_eq!(parsed["domain_times"]["youtube.com"]["total_seconds"], 30);
}

#[test]
fn test_tracking_off_then_on() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["tracking", "off"]);
    assert_eq!(code, 0, "tracking off failed");

    let (stdout, _, code) = run_cli(dir.path(), &["data"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["is_tracking"], false);

    let (_, _, code) = run_cli(dir.path(), &["tracking", "on"]);
    assert_eq!(code, 0, "tracking on failed");
}

#[test]
fn test_goal_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["goal", "add", "Deep work", "--target", "2", "--category", "productivity"],
    );
    assert_eq!(code, 0, "goal add failed: {stderr}");
    let added: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(added["title"], "Deep work");

    let (stdout, _, code) = run_cli(dir.path(), &["goal", "list"]);
    assert_eq!(code, 0, "goal list failed");
    let goals: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    // Two default goals plus the one just added.
    assert_eq!(goals.as_array().unwrap().len(), 3);
}

#[test]
fn test_goal_add_rejects_bad_target() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["goal", "add", "Bad", "--target", "0"],
    );
    assert_ne!(code, 0, "goal add with zero target should fail");
    assert!(stderr.contains("error:"));
}

#[test]
fn test_reset_clears_data() {
    let dir = tempfile::tempdir().unwrap();
    let log = r#"[
        {"type": "focus_changed", "tab_id": 1, "url": "https://github.com/x", "at": "2026-03-02T09:00:00+00:00"},
        {"type": "tab_closed", "tab_id": 1, "at": "2026-03-02T09:01:00+00:00"}
    ]"#;
    let log_path = dir.path().join("events.json");
    std::fs::write(&log_path, log).unwrap();
    let (_, _, code) = run_cli(dir.path(), &["replay", log_path.to_str().unwrap()]);
    assert_eq!(code, 0);

    let (_, _, code) = run_cli(dir.path(), &["reset"]);
    assert_eq!(code, 0, "reset failed");

    let (stdout, _, code) = run_cli(dir.path(), &["data"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["domain_times"].as_object().unwrap().is_empty());
}

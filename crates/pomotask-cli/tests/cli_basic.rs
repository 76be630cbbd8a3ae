//! Basic CLI E2E tests.
//!
//! Each test runs the built binary with HOME pointed at a scratch
//! directory, so config and data never touch the real profile.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomotask"))
        .args(args)
        .env("HOME", home)
        .env_remove("POMOTASK_ENV")
        .env("POMOTASK_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_task_add_list_toggle_delete() {
    let home = TempDir::new().unwrap();

    let added = json(&run_ok(home.path(), &["task", "add", "Write report", "--tag", "work"]));
    let id = added["id"].as_str().unwrap().to_string();
    assert_eq!(added["title"], "Write report");
    assert_eq!(added["tag"], "work");
    assert_eq!(added["completed"], false);

    let toggled = json(&run_ok(home.path(), &["task", "toggle", &id]));
    assert_eq!(toggled["completed"], true);

    let listed = json(&run_ok(home.path(), &["task", "list"]));
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let open = json(&run_ok(home.path(), &["task", "list", "--open"]));
    assert!(open.as_array().unwrap().is_empty());

    run_ok(home.path(), &["task", "delete", &id]);
    let listed = json(&run_ok(home.path(), &["task", "list"]));
    assert!(listed.as_array().unwrap().is_empty());
}

#[test]
fn test_task_blank_title_is_ignored() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["task", "add", "   "]);
    assert_eq!(code, 0);
    assert!(stderr.contains("nothing added"));
    let listed = json(&run_ok(home.path(), &["task", "list"]));
    assert!(listed.as_array().unwrap().is_empty());
}

#[test]
fn test_task_edit_defaults_blank_tag() {
    let home = TempDir::new().unwrap();
    let added = json(&run_ok(home.path(), &["task", "add", "draft", "--tag", "work"]));
    let id = added["id"].as_str().unwrap();

    let edited = json(&run_ok(
        home.path(),
        &["task", "edit", id, "--title", "final", "--tag", ""],
    ));
    assert_eq!(edited["title"], "final");
    assert_eq!(edited["tag"], "personal");
}

#[test]
fn test_unknown_task_fails() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["task", "toggle", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_timer_show_defaults() {
    let home = TempDir::new().unwrap();
    let snapshot = json(&run_ok(home.path(), &["timer", "show"]));
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["phase"], "focus");
    assert_eq!(snapshot["seconds_remaining"], 1500);
    assert_eq!(snapshot["session_index"], 1);
    assert_eq!(snapshot["is_running"], false);
}

#[test]
fn test_settings_set_updates_timer() {
    let home = TempDir::new().unwrap();
    run_ok(home.path(), &["settings", "set", "--focus", "40", "--sessions", "4"]);

    let settings = json(&run_ok(home.path(), &["settings", "show"]));
    assert_eq!(settings["focus_minutes"], 40);
    assert_eq!(settings["sessions_before_long_break"], 4);

    let snapshot = json(&run_ok(home.path(), &["timer", "show"]));
    assert_eq!(snapshot["seconds_remaining"], 2400);
}

#[test]
fn test_settings_rejects_invalid_values() {
    let home = TempDir::new().unwrap();
    for bad in ["0", "-5", "abc"] {
        let flag = format!("--focus={bad}");
        let (_, stderr, code) = run_cli(home.path(), &["settings", "set", &flag]);
        assert_eq!(code, 1, "focus={bad} accepted");
        assert!(stderr.contains("focus_minutes"), "{stderr}");
    }
    let settings = json(&run_ok(home.path(), &["settings", "show"]));
    assert_eq!(settings["focus_minutes"], 25);
}

#[test]
fn test_theme_toggle_and_set() {
    let home = TempDir::new().unwrap();
    assert_eq!(run_ok(home.path(), &["theme", "show"]).trim(), "light");
    assert_eq!(run_ok(home.path(), &["theme", "toggle"]).trim(), "dark");
    assert_eq!(run_ok(home.path(), &["theme", "show"]).trim(), "dark");
    assert_eq!(run_ok(home.path(), &["theme", "set", "light"]).trim(), "light");

    let (_, _, code) = run_cli(home.path(), &["theme", "set", "blue"]);
    assert_eq!(code, 1);
}

#[test]
fn test_xp_starts_at_level_one() {
    let home = TempDir::new().unwrap();
    let xp = json(&run_ok(home.path(), &["xp", "show"]));
    assert_eq!(xp["xp"], 0);
    assert_eq!(xp["level"], 1);
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    assert_eq!(run_ok(home.path(), &["config", "get", "sync.debounce_secs"]).trim(), "300");
    run_ok(home.path(), &["config", "set", "sync.debounce_secs", "60"]);
    assert_eq!(run_ok(home.path(), &["config", "get", "sync.debounce_secs"]).trim(), "60");

    let (_, _, code) = run_cli(home.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_set_timer_key_reaches_timer() {
    let home = TempDir::new().unwrap();
    run_ok(home.path(), &["config", "set", "timer.focus_minutes", "40"]);
    let snapshot = json(&run_ok(home.path(), &["timer", "show"]));
    assert_eq!(snapshot["seconds_remaining"], 2400);

    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "timer.focus_minutes", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("focus_minutes"), "{stderr}");
}

#[test]
fn test_hand_edited_zero_duration_is_rejected() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config").join("pomotask");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[timer]\nfocus_minutes = 0\n").unwrap();

    let (_, stderr, code) = run_cli(home.path(), &["timer", "show"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("focus_minutes"), "{stderr}");
}

#[test]
fn test_sync_requires_remote_config() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["sync", "pull"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not configured"), "{stderr}");
}

//! Basic CLI E2E tests.
//!
//! Each test points the binary at its own config directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pomotimer(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pomotimer").unwrap();
    cmd.env("POMOTIMER_CONFIG_DIR", dir.path())
        .env_remove("POMOTIMER_TICK_MS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_config_list() {
    let dir = TempDir::new().unwrap();
    pomotimer(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"work_minutes\": 25"));
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    pomotimer(&dir)
        .args(["config", "set", "schedule.long_break_minutes", "20"])
        .assert()
        .success()
        .stdout("ok\n");
    pomotimer(&dir)
        .args(["config", "get", "schedule.long_break_minutes"])
        .assert()
        .success()
        .stdout("20\n");
}

#[test]
fn test_config_set_empty_clears_sound_file() {
    let dir = TempDir::new().unwrap();
    pomotimer(&dir)
        .args(["config", "set", "notifications.sound_file", "/tmp/ding.wav"])
        .assert()
        .success();
    pomotimer(&dir)
        .args(["config", "set", "notifications.sound_file", ""])
        .assert()
        .success();
    pomotimer(&dir)
        .args(["config", "get", "notifications.sound_file"])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn test_json_repeated_start_reports_once() {
    let dir = TempDir::new().unwrap();
    let output = pomotimer(&dir)
        .args(["run", "--json"])
        .write_stdin("stop\nstart\nstart\nquit\n")
        .timeout(std::time::Duration::from_secs(30))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("\"type\":\"timer_started\"").count(), 1);
    assert!(!stdout.contains("\"type\":\"timer_stopped\""));
}

#[test]
fn test_config_get_unknown_key() {
    let dir = TempDir::new().unwrap();
    pomotimer(&dir)
        .args(["config", "get", "ui.nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key"));
}

#[test]
fn test_config_set_rejects_zero_duration() {
    let dir = TempDir::new().unwrap();
    pomotimer(&dir)
        .args(["config", "set", "schedule.work_minutes", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("work_minutes"));
}

#[test]
fn test_zero_minutes_argument_is_config_error() {
    let dir = TempDir::new().unwrap();
    pomotimer(&dir)
        .args(["0", "5", "15", "--json"])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("work_minutes"));
}

#[test]
fn test_non_numeric_argument_is_rejected() {
    let dir = TempDir::new().unwrap();
    pomotimer(&dir)
        .args(["ten", "--json"])
        .write_stdin("")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_json_run_completes_first_interval() {
    let dir = TempDir::new().unwrap();
    pomotimer(&dir)
        .args(["config", "set", "notifications.desktop", "false"])
        .assert()
        .success();
    let output = pomotimer(&dir)
        .args(["1", "1", "1", "--tick-ms", "1", "--json"])
        .write_stdin("start\n")
        .timeout(std::time::Duration::from_secs(30))
        .output()
        .unwrap();
    assert!(output.status.success());

    let events: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let completed: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "interval_completed")
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["message"], "Session done, take a break");
    assert_eq!(completed[0]["session_count"], 1);
    assert_eq!(events.last().unwrap()["kind"], "short_break");
}

#[test]
fn test_json_skip_and_quit() {
    let dir = TempDir::new().unwrap();
    pomotimer(&dir)
        .args(["run", "--json"])
        .write_stdin("skip\nskip\nreset\nquit\n")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"timer_skipped\""))
        .stdout(predicate::str::contains("\"type\":\"timer_reset\""))
        .stdout(predicate::str::contains("interval_completed").not());
}

use assert_cmd::Command;
use predicates::prelude::*;

const NOW: &str = "2024-03-15T10:00:00Z";

fn afk() -> Command {
    let mut cmd = Command::cargo_bin("afk").unwrap();
    cmd.env_remove("AFK_UTC_OFFSET").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_text_output() {
    afk()
        .args(["--now", NOW, "afk", "for", "30", "min"])
        .assert()
        .success()
        .stdout("2024-03-15T10:00:00+00:00\t2024-03-15T10:30:00+00:00\n");
}

#[test]
fn test_phrase_as_single_argument() {
    afk()
        .args(["--now", NOW, "afk from 5pm"])
        .assert()
        .success()
        .stdout("2024-03-15T17:00:00+00:00\t2024-03-15T23:59:59.999999+00:00\n");
}

#[test]
fn test_json_output() {
    let output = afk()
        .args(["--now", NOW, "--format", "json", "afk", "from", "4pm", "for", "1", "hr"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["start"], "2024-03-15T16:00:00+00:00");
    assert_eq!(json["end"], "2024-03-15T17:00:00+00:00");
}

#[test]
fn test_negative_length_not_taken_as_flag() {
    afk()
        .args(["--now", NOW, "afk", "for", "-30", "min"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("2024-03-15T09:30:00+00:00\n"));
}

#[test]
fn test_utc_offset_flag() {
    afk()
        .args(["--now", NOW, "--utc-offset", "+05:30", "afk today"])
        .assert()
        .success()
        .stdout("2024-03-15T15:30:00+05:30\t2024-03-15T23:59:59.999999+05:30\n");
}

#[test]
fn test_utc_offset_from_env() {
    afk()
        .env("AFK_UTC_OFFSET", "-3600")
        .args(["--now", NOW, "afk for 1 hour"])
        .assert()
        .success()
        .stdout("2024-03-15T09:00:00-01:00\t2024-03-15T10:00:00-01:00\n");
}

#[test]
fn test_unparseable_phrase_fails() {
    afk()
        .args(["--now", NOW, "afk, brb"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unparseable phrase"));
}

#[test]
fn test_invalid_now_fails() {
    afk()
        .args(["--now", "yesterday-ish", "afk for 1 hour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --now value"));
}

#[test]
fn test_invalid_offset_fails() {
    afk()
        .args(["--now", NOW, "--utc-offset", "+25:00", "afk for 1 hour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --utc-offset"));
}

#[test]
fn test_missing_phrase_fails() {
    afk().args(["--now", NOW]).assert().failure();
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    afk()
        .args(["-vv", "--now", NOW, "afk for 30 min"])
        .assert()
        .success()
        .stdout("2024-03-15T10:00:00+00:00\t2024-03-15T10:30:00+00:00\n")
        .stderr(predicate::str::contains("extracted time expression"));
}

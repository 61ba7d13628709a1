//! Binary-level tests that never reach AWS.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn logsweep() -> Command {
    let mut cmd = Command::cargo_bin("logsweep").expect("binary should build");
    cmd.env_remove("RUST_LOG")
        .env_remove("LOGSWEEP_PROFILE")
        .env_remove("LOGSWEEP_REGION");
    cmd
}

#[test]
fn help_lists_search_flags() {
    logsweep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-group"))
        .stdout(predicate::str::contains("--filter"))
        .stdout(predicate::str::contains("YYYYMMDDhhmmss"));
}

#[test]
fn missing_required_flags_is_usage_error() {
    logsweep()
        .args(["--filter", "ERROR"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--log-group"));
}

#[test]
fn end_before_start_fails_before_querying() {
    logsweep()
        .args([
            "--log-group",
            "/aws/lambda/orders",
            "--filter",
            "ERROR",
            "--start",
            "20240102000000",
            "--end",
            "20240101000000",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid range"));
}

#[test]
fn malformed_time_is_reported() {
    logsweep()
        .args([
            "-g",
            "grp",
            "-f",
            "ERROR",
            "-s",
            "2024-01-01",
            "-e",
            "20240101000000",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid time '2024-01-01'"));
}

#[test]
fn invalid_config_file_is_reported() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"[query]\nwindow_secs = 0\n")
        .expect("write config");

    logsweep()
        .args([
            "-g",
            "grp",
            "-f",
            "ERROR",
            "-s",
            "20240101000000",
            "-e",
            "20240101010000",
            "--config",
        ])
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("query.window_secs"));
}

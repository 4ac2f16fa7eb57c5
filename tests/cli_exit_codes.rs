//! Exit code contract of the probe binaries.

use std::process::{Command, Output};

mod common;

fn check_haproxy(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_check-haproxy"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run check-haproxy")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn inverted_thresholds_fail_before_io() {
    // The socket path does not exist; a threshold error must win anyway.
    let output = check_haproxy(&[
        "--socketfile",
        "/nonexistent/admin.sock",
        "--slimwarn",
        "95",
        "--slimcrit",
        "90",
    ]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(
        stdout(&output).trim_end(),
        "UNKNOWN - Warning threshold (95%) must be lower than critical threshold (90%)"
    );
}

#[test]
fn missing_socket_is_unknown() {
    let output = check_haproxy(&["--socketfile", "/nonexistent/admin.sock"]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(
        stdout(&output).trim_end(),
        "UNKNOWN - Socket file /nonexistent/admin.sock not found!"
    );
}

#[test]
fn name_requires_entity_mode() {
    let output = check_haproxy(&["--name", "www"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).starts_with("UNKNOWN - --name only works"));
}

#[test]
fn bad_flag_is_unknown() {
    let output = check_haproxy(&["--mode", "cluster"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).starts_with("UNKNOWN - "));
}

#[test]
fn healthy_socket_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("admin.sock");

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(common::start_mock_stats_socket(&path, common::SHOW_STAT));

    let output = check_haproxy(&["--socketfile", path.to_str().unwrap(), "--perfdata"]);
    assert_eq!(output.status.code(), Some(0));
    let line = stdout(&output);
    assert!(line.starts_with("OK - haproxy running with 2 frontends"));
    assert!(line.contains(" | 'sessions'=12;;;;"));
    assert_eq!(line.lines().count(), 1);
}

#[test]
fn critical_frontend_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("admin.sock");

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(common::start_mock_stats_socket(&path, common::SHOW_STAT));

    // www carries 12/100 sessions: critical at 10%.
    let output = check_haproxy(&[
        "--socketfile",
        path.to_str().unwrap(),
        "--mode",
        "frontend",
        "--name",
        "www",
        "--slimwarn",
        "5",
        "--slimcrit",
        "10",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).starts_with("CRITICAL - HAProxy frontend www is OPEN, Sessions: 12/100"));
}

#[test]
fn malformed_config_is_one_unknown_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, b"[thresholds\n").unwrap();

    let output = check_haproxy(&["--config", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
    let line = stdout(&output);
    assert_eq!(line.lines().count(), 1);
    assert!(line.starts_with("UNKNOWN - Parse error: TOML parse error"));
}

use std::process::Command;

use crate::common::init_test_logging;

#[test]
fn test_triggerd_help_includes_usage() {
    init_test_logging();
    crate::test_log!("TEST START: test_triggerd_help_includes_usage");

    let output = Command::new(env!("CARGO_BIN_EXE_triggerd"))
        .arg("--help")
        .output()
        .expect("Failed to run triggerd --help");

    assert!(output.status.success(), "triggerd --help failed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("triggerd"), "Expected usage, got: {stdout}");
    assert!(stdout.contains("--port"), "Expected --port flag, got: {stdout}");
    assert!(
        stdout.contains("--maintenance-timeout"),
        "Expected --maintenance-timeout flag, got: {stdout}"
    );

    crate::test_log!("TEST PASS: test_triggerd_help_includes_usage");
}

#[test]
fn test_triggerd_rejects_bad_timeout() {
    init_test_logging();

    let output = Command::new(env!("CARGO_BIN_EXE_triggerd"))
        .args(["--maintenance-timeout", "soon"])
        .output()
        .expect("Failed to run triggerd");

    assert!(!output.status.success());
}

use serde_json::Value;
use tempfile::TempDir;

use crate::common::{DaemonProcess, init_test_logging};

const TOKEN: &str = "e2e-token";

#[test]
fn test_end_to_end_status_codes() {
    init_test_logging();
    crate::test_log!("TEST START: test_end_to_end_status_codes");

    let home = TempDir::new().unwrap();
    let daemon = DaemonProcess::start(home.path(), TOKEN);
    let auth = format!("Bearer {TOKEN}");

    let (status, body) = daemon.post(r#"{"action":"test","app":"e2e"}"#, Some(&auth));
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["app"], "e2e");
    assert_eq!(json["tests"]["storage"], "PASSED");

    let (status, body) = daemon.post(r#"{"action":"deploy"}"#, Some(&auth));
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["message"], "Unknown action");

    let (status, _) = daemon.post("{}", None);
    assert_eq!(status, 401);

    let (status, _) = daemon.post("{}", Some("Bearer nope"));
    assert_eq!(status, 401);

    let (status, _) = daemon.post("{{{", None);
    assert_eq!(status, 400);

    crate::test_log!("TEST PASS: test_end_to_end_status_codes");
}

#[cfg(unix)]
#[test]
fn test_end_to_end_runs_home_maintenance_script() {
    init_test_logging();

    let home = TempDir::new().unwrap();
    let marker = home.path().join("maintenance-ran");
    std::fs::write(
        home.path().join("server-maintenance.sh"),
        format!("echo running\ntouch '{}'\nexit 1\n", marker.display()),
    )
    .unwrap();

    let daemon = DaemonProcess::start(home.path(), TOKEN);
    let (status, body) = daemon.post(r#"{"app":"with-maint"}"#, Some(&format!("Bearer {TOKEN}")));

    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "success");
    assert!(marker.exists(), "maintenance script did not run");
}

#[test]
fn test_end_to_end_health_check() {
    init_test_logging();

    let home = TempDir::new().unwrap();
    let daemon = DaemonProcess::start(home.path(), TOKEN);
    let (status, body) =
        daemon.request("GET /status HTTP/1.1\r\nHost: localhost\r\n\r\n");

    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "success");
}

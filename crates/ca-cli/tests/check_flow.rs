//! End-to-end test of `ca check` against a mocked roster and session API.

use std::process::Command;

use chrono::{Duration, Utc};
use httpmock::Method::GET;
use httpmock::MockServer;
use tempfile::TempDir;

fn ca_binary() -> String {
    env!("CARGO_BIN_EXE_ca").to_string()
}

/// Writes a config pointing both APIs at the mock server, with pauses and
/// backoff zeroed so the test runs fast.
fn write_config(temp: &TempDir, server: &MockServer) -> std::path::PathBuf {
    let path = temp.path().join("config.toml");
    let contents = format!(
        r#"
facility = "ZJX"
watched_prefixes = ["JAX_"]
batch_pause_secs = 0
retry_base_delay_secs = 0
roster_base_url = "{base}"
sessions_base_url = "{base}"
"#,
        base = server.base_url()
    );
    std::fs::write(&path, contents).unwrap();
    path
}

fn session_timestamp(days_ago: i64, hours_long: i64) -> (String, String) {
    let start = Utc::now() - Duration::days(days_ago);
    let end = start + Duration::hours(hours_long);
    let format = "%Y-%m-%dT%H:%M:%SZ";
    (
        start.format(format).to_string(),
        end.format(format).to_string(),
    )
}

#[test]
fn check_reports_inactive_and_exempt_controllers() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/facility/ZJX/roster/both");
        then.status(200).json_body(serde_json::json!({
            "data": [
                {
                    "cid": 1_000_010,
                    "fname": "Olive",
                    "lname": "Observer",
                    "email": "olive@example.com",
                    "rating_short": "OBS",
                    "membership": "home"
                },
                {
                    "cid": 1_000_020,
                    "fname": "Casey",
                    "lname": "Controller",
                    "email": "casey@example.com",
                    "rating_short": "C1",
                    "membership": "home"
                }
            ]
        }));
    });

    // 30 days ago: inside the window. The second session is on an
    // unwatched prefix and must not count.
    let (watched_start, watched_end) = session_timestamp(30, 2);
    let (other_start, other_end) = session_timestamp(20, 5);
    server.mock(|when, then| {
        when.method(GET).path("/members/1000020/atc");
        then.status(200).json_body(serde_json::json!({
            "items": [
                {
                    "connection_id": {
                        "callsign": "JAX_TWR",
                        "start": watched_start,
                        "end": watched_end
                    }
                },
                {
                    "connection_id": {
                        "callsign": "MIA_CTR",
                        "start": other_start,
                        "end": other_end
                    }
                }
            ]
        }));
    });

    let temp = TempDir::new().unwrap();
    let config_path = write_config(&temp, &server);

    let output = Command::new(ca_binary())
        .arg("--config")
        .arg(&config_path)
        .arg("check")
        .output()
        .expect("failed to run ca check");
    assert!(
        output.status.success(),
        "ca check should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Casey Controller"), "stdout: {stdout}");
    assert!(stdout.contains("2.00"), "stdout: {stdout}");
    assert!(stdout.contains("JAX_TWR"), "stdout: {stdout}");
    assert!(!stdout.contains("MIA_CTR"), "stdout: {stdout}");
    assert!(stdout.contains("Olive Observer"), "stdout: {stdout}");
    assert!(stdout.contains("Total controllers processed: 1"));
    assert!(stdout.contains("Total inactive controllers: 1"));
    assert!(stdout.contains("Total OBS controllers excluded: 1"));
}

#[test]
fn check_json_emits_the_classification_result() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/facility/ZJX/roster/both");
        then.status(200).json_body(serde_json::json!({
            "data": [
                {
                    "cid": 1_000_020,
                    "fname": "Casey",
                    "lname": "Controller",
                    "email": "casey@example.com",
                    "rating_short": "C1",
                    "membership": "visitor"
                }
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/members/1000020/atc");
        then.status(200).json_body(serde_json::json!({ "items": [] }));
    });

    let temp = TempDir::new().unwrap();
    let config_path = write_config(&temp, &server);

    let output = Command::new(ca_binary())
        .arg("--config")
        .arg(&config_path)
        .args(["check", "--json"])
        .output()
        .expect("failed to run ca check --json");
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["total_processed"], 1);
    assert_eq!(parsed["inactive"][0]["cid"], 1_000_020);
    assert_eq!(parsed["inactive"][0]["hours"], 0.0);
    assert_eq!(parsed["inactive"][0]["membership"], "visitor");
}

#[test]
fn roster_failure_is_fatal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/facility/ZJX/roster/both");
        then.status(403);
    });

    let temp = TempDir::new().unwrap();
    let config_path = write_config(&temp, &server);

    let output = Command::new(ca_binary())
        .arg("--config")
        .arg(&config_path)
        .arg("check")
        .output()
        .expect("failed to run ca check");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to fetch roster"), "stderr: {stderr}");
}

#[test]
fn no_subcommand_prints_help() {
    let output = Command::new(ca_binary())
        .output()
        .expect("failed to run ca");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "stdout: {stdout}");
}

//! Integration tests for the `flowgate` CLI binary.
//!
//! Argument parsing, offline catalog commands, exit codes, and a couple of
//! controller-bound commands against a mocked controller.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `flowgate` binary with env isolation.
///
/// Clears all `FLOWGATE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn flowgate_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("flowgate");
    cmd.env("HOME", "/tmp/flowgate-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/flowgate-cli-test-nonexistent")
        .env_remove("FLOWGATE_CONTROLLER")
        .env_remove("FLOWGATE_TIMEOUT")
        .env_remove("FLOWGATE_CATALOG")
        .env_remove("FLOWGATE_OUTPUT")
        .env_remove("FLOWGATE_INSECURE")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const CATALOG: &str = r"
students:
  - code: 20201234
    name: Alice
    mac: AA:BB:CC:00:00:01
    ip: 10.0.0.1
  - code: 20205678
    name: Bob
    mac: aa:bb:cc:00:00:02
servers:
  - name: lab
    ip: 10.0.0.2
    mac: aa:bb:cc:00:00:99
    services:
      - { name: ssh, protocol: TCP, port: 22 }
      - { name: web, protocol: TCP, port: 80 }
courses:
  - code: TEL354
    name: Redes
    status: active
    students: [20201234]
    servers:
      - name: lab
        allowed_services: [ssh]
";

fn catalog_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();
    file
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = flowgate_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    flowgate_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("SDN controller")
            .and(predicate::str::contains("connect"))
            .and(predicate::str::contains("catalog"))
            .and(predicate::str::contains("menu")),
    );
}

#[test]
fn test_version_flag() {
    flowgate_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flowgate"));
}

#[test]
fn test_completions_bash() {
    flowgate_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flowgate"));
}

#[test]
fn test_config_path_prints_location() {
    flowgate_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Offline catalog ─────────────────────────────────────────────────

#[test]
fn test_catalog_without_file_is_usage_error() {
    let output = flowgate_cmd().args(["catalog", "courses"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_catalog_lists_courses_students_servers() {
    let file = catalog_file();

    flowgate_cmd()
        .arg("--catalog")
        .arg(file.path())
        .args(["catalog", "courses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TEL354").and(predicate::str::contains("Redes")));

    flowgate_cmd()
        .arg("--catalog")
        .arg(file.path())
        .args(["-o", "plain", "catalog", "students"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20201234").and(predicate::str::contains("20205678")));

    flowgate_cmd()
        .env("FLOWGATE_CATALOG", file.path())
        .args(["catalog", "servers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab"));
}

#[test]
fn test_catalog_show_unknown_course_is_not_found() {
    let file = catalog_file();
    let output = flowgate_cmd()
        .arg("--catalog")
        .arg(file.path())
        .args(["catalog", "show", "NOPE"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_catalog_check_reports_authorization() {
    let file = catalog_file();

    flowgate_cmd()
        .arg("--catalog")
        .arg(file.path())
        .args(["catalog", "check", "20201234", "lab", "ssh"])
        .assert()
        .success();

    // web is offered but not granted to the course.
    let output = flowgate_cmd()
        .arg("--catalog")
        .arg(file.path())
        .args(["catalog", "check", "20201234", "lab", "web"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));

    // Bob is not enrolled anywhere.
    let output = flowgate_cmd()
        .arg("--catalog")
        .arg(file.path())
        .args(["catalog", "check", "20205678", "lab", "ssh"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
}

// ── Controller-bound commands ───────────────────────────────────────

#[test]
fn test_locate_rejects_malformed_mac() {
    let output = flowgate_cmd()
        .args(["--controller", "http://127.0.0.1:9", "locate", "not-a-mac"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("MAC"));
}

#[test]
fn test_connect_unauthorized_exits_before_contacting_controller() {
    let file = catalog_file();
    let output = flowgate_cmd()
        .arg("--catalog")
        .arg(file.path())
        .args(["--controller", "http://127.0.0.1:9"])
        .args(["connect", "20205678", "lab", "ssh"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_connect_unreachable_controller() {
    let file = catalog_file();
    let output = flowgate_cmd()
        .arg("--catalog")
        .arg(file.path())
        .args(["--controller", "http://127.0.0.1:9", "--timeout", "2"])
        .args(["connect", "20201234", "lab", "ssh"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_locate_against_mock_controller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wm/device/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [{
                "mac": ["aa:bb:cc:00:00:01"],
                "ipv4": ["10.0.0.1"],
                "attachmentPoint": [{ "switch": "00:00:00:00:00:00:00:01", "port": 3 }]
            }]
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        flowgate_cmd()
            .args(["--controller", &uri, "-o", "plain"])
            .args(["locate", "AA-BB-CC-00-00-01"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "00:00:00:00:00:00:00:01/3"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_locate_unknown_host_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wm/device/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        flowgate_cmd()
            .args(["--controller", &uri, "locate", "aa:bb:cc:00:00:42"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(4));
}

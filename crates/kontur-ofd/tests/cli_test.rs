//! Integration tests for the `kontur-ofd` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without a network; command output is checked against a wiremock server
//! standing in for the OFD service.
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `kontur-ofd` binary with env isolation.
///
/// Clears all `KONTUR_OFD_*` env vars and points the config file at
/// `config` so tests never touch the user's real configuration.
fn ofd_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("kontur-ofd");
    cmd.env("KONTUR_OFD_CONFIG", config)
        .env_remove("KONTUR_OFD_PROFILE")
        .env_remove("KONTUR_OFD_LOGIN")
        .env_remove("KONTUR_OFD_PASSWORD")
        .env_remove("KONTUR_OFD_API_KEY")
        .env_remove("KONTUR_OFD_API_URL")
        .env_remove("KONTUR_OFD_AUTH_URL")
        .env_remove("KONTUR_OFD_TIMEOUT")
        .env_remove("KONTUR_OFD_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

fn missing_config() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    (dir, path)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, config) = missing_config();
    let output = ofd_cmd(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_dir, config) = missing_config();
    ofd_cmd(&config).arg("--help").assert().success().stdout(
        predicate::str::contains("Kontur OFD")
            .and(predicate::str::contains("receipts"))
            .and(predicate::str::contains("organizations"))
            .and(predicate::str::contains("cashboxes")),
    );
}

#[test]
fn test_version_flag() {
    let (_dir, config) = missing_config();
    ofd_cmd(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kontur-ofd"));
}

#[test]
fn test_completions_bash() {
    let (_dir, config) = missing_config();
    ofd_cmd(&config)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_receipts_requires_date() {
    let (_dir, config) = missing_config();
    ofd_cmd(&config)
        .arg("receipts")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--date"));
}

#[test]
fn test_cashboxes_requires_org() {
    let (_dir, config) = missing_config();
    ofd_cmd(&config)
        .arg("cashboxes")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--org"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_credentials_exit_code() {
    let (_dir, config) = missing_config();
    let output = ofd_cmd(&config)
        .args(["receipts", "--date", "2024-03-01"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("login"), "Expected 'login' in output:\n{text}");
}

#[test]
fn test_unknown_profile_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "[profiles.shop]\nlogin = \"shop\"\npassword = \"pw\"\napi_key = \"key\"\n",
    )
    .unwrap();

    let output = ofd_cmd(&config)
        .args(["--profile", "warehouse", "organizations"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("warehouse") && text.contains("shop"),
        "Expected profile names in output:\n{text}"
    );
}

#[test]
fn test_unreadable_ca_cert_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let ca = dir.path().join("missing-ca.pem");
    std::fs::write(
        &config,
        format!(
            "[profiles.default]\nlogin = \"shop\"\npassword = \"pw\"\napi_key = \"key\"\nca_cert = {:?}\n",
            ca.display().to_string()
        ),
    )
    .unwrap();

    let output = ofd_cmd(&config).arg("organizations").output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("ca_cert"), "Expected 'ca_cert' in output:\n{text}");
}

// ── Connection errors ───────────────────────────────────────────────

#[test]
fn test_unreachable_service_exit_code() {
    let (_dir, config) = missing_config();
    ofd_cmd(&config)
        .args([
            "--login",
            "shop",
            "--password",
            "pw",
            "--api-key",
            "key",
            "--auth-url",
            "http://127.0.0.1:1/auth/authenticate-by-pass",
            "--api-url",
            "http://127.0.0.1:1",
            "receipts",
            "--date",
            "2024-03-01",
        ])
        .assert()
        .code(7);
}

// ── Against a mock service ──────────────────────────────────────────

const SID: &str = "sid-1";
const DATE: &str = "2024-03-01";

async fn mock_service() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/authenticate-by-pass"))
        .and(query_param("login", "testlogin@shop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Sid": SID })))
        .mount(&server)
        .await;
    mount_get(
        &server,
        "/v2/organizations",
        json!([{ "id": "org-1", "inn": "7701234567", "shortName": "Ромашка" }]),
    )
    .await;
    mount_get(
        &server,
        "/v2/organizations/org-1/cashboxes",
        json!([{ "regNumber": "kkt-1", "name": "Касса 1" }]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations/org-1/cashboxes/kkt-1/documents"))
        .and(query_param("date", DATE))
        .and(header("ofd_api_key", "key"))
        .and(header("auth.sid", SID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "fiscalDocumentNumber": 11, "kktRegId": "kkt-1", "totalSum": 18400 },
            { "fiscalDocumentNumber": 12, "kktRegId": "kkt-1", "totalSum": 500 }
        ])))
        .mount(&server)
        .await;

    server
}

async fn mount_get(server: &MockServer, url_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .and(header("ofd_api_key", "key"))
        .and(header("auth.sid", SID))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Run the binary against `server` with the given trailing arguments.
async fn run_against(server: &MockServer, args: &[&str]) -> Output {
    let (dir, config) = missing_config();
    let auth_url = format!("{}/auth/authenticate-by-pass", server.uri());
    let api_url = server.uri();
    let mut cmd = ofd_cmd(&config);
    cmd.args([
        "--login",
        "shop",
        "--password",
        "pw",
        "--api-key",
        "key",
        "--auth-url",
        auth_url.as_str(),
        "--api-url",
        api_url.as_str(),
    ])
    .args(args);

    // The mock server keeps serving while the binary blocks this worker.
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    drop(dir);
    output
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed:\n{}",
        combined_output(output)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_organizations_table() {
    let server = mock_service().await;
    let out = stdout(&run_against(&server, &["organizations"]).await);

    assert!(out.contains("INN"), "missing header:\n{out}");
    assert!(out.contains("org-1"), "missing id:\n{out}");
    assert!(out.contains("7701234567"), "missing INN:\n{out}");
    assert!(out.contains("Ромашка"), "missing name:\n{out}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cashboxes_json() {
    let server = mock_service().await;
    let out = stdout(&run_against(&server, &["-o", "json", "cashboxes", "--org", "org-1"]).await);

    let cashboxes: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(cashboxes.as_array().map(Vec::len), Some(1));
    assert_eq!(cashboxes[0]["regNumber"], "kkt-1");
    assert_eq!(cashboxes[0]["name"], "Касса 1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_receipts_table_shows_rubles() {
    let server = mock_service().await;
    let out = stdout(&run_against(&server, &["receipts", "--date", DATE]).await);

    assert!(out.contains("FD #"), "missing header:\n{out}");
    assert!(out.contains("184.00"), "missing total:\n{out}");
    assert!(out.contains("5.00"), "missing total:\n{out}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_receipts_plain_lists_documents_in_order() {
    let server = mock_service().await;
    let out = stdout(&run_against(&server, &["-o", "plain", "receipts", "-d", DATE]).await);

    assert_eq!(out, "kkt-1\t11\nkkt-1\t12\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quiet_suppresses_output() {
    let server = mock_service().await;
    let out = stdout(&run_against(&server, &["-q", "receipts", "--date", DATE]).await);

    assert_eq!(out, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/authenticate-by-pass"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad password"))
        .mount(&server)
        .await;

    let output = run_against(&server, &["organizations"]).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
}

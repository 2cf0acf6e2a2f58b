use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::MockServer;

mod common;

use common::http_mock::{expect_any_submit, expect_submit};

/// Binary with an isolated HOME and working directory so no stray config is picked up.
fn questhook_cmd(sandbox: &Path) -> Command {
    let mut cmd = Command::cargo_bin("questhook").unwrap();
    cmd.current_dir(sandbox)
        .env("HOME", sandbox)
        .env_remove("QUESTHOOK_CONFIG")
        .env_remove("QUESTHOOK_SERVICE_URL")
        .env_remove("QUESTHOOK_TOKEN_PATH")
        .env_remove("QUESTHOOK_AUTH_TIMEOUT");
    cmd
}

/// C1: questhook logout removes the token file
#[test]
fn logout_removes_cached_token() {
    let sandbox = tempfile::tempdir().unwrap();
    let token_path = sandbox.path().join("token");
    std::fs::write(&token_path, "abc123").unwrap();

    questhook_cmd(sandbox.path())
        .args(["logout", "--token-path"])
        .arg(&token_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed cached token"));

    assert!(!token_path.exists());
}

/// C2: logout with nothing cached still succeeds
#[test]
fn logout_without_token_succeeds() {
    let sandbox = tempfile::tempdir().unwrap();
    questhook_cmd(sandbox.path())
        .args(["logout", "--token-path"])
        .arg(sandbox.path().join("missing"))
        .assert()
        .success();
}

/// C3: status reports cache state without leaking the token
#[test]
fn status_does_not_print_token() {
    let sandbox = tempfile::tempdir().unwrap();
    let token_path = sandbox.path().join("token");

    questhook_cmd(sandbox.path())
        .args(["status", "--token-path"])
        .arg(&token_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached token"));

    std::fs::write(&token_path, "super-secret").unwrap();
    questhook_cmd(sandbox.path())
        .args(["status", "--token-path"])
        .arg(&token_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Token cached at"))
        .stdout(predicate::str::contains("super-secret").not());
}

/// C4: report with a cached token posts and prints the summary
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn report_with_cached_token() {
    let server = MockServer::start().await;
    expect_submit(&server, "cached", 200, 1).await;

    let sandbox = tempfile::tempdir().unwrap();
    common::write_hardhat_deployments(&sandbox.path().join("deployments"));
    let token_path = sandbox.path().join("token");
    std::fs::write(&token_path, "cached").unwrap();

    questhook_cmd(sandbox.path())
        .args(["report", "--service-url", server.uri().as_str(), "--token-path"])
        .arg(&token_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Server updated"))
        .stdout(predicate::str::contains("Greeter"));
}

/// C5: no subcommand behaves like report, config file supplies the service
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn default_command_reads_config_file() {
    let server = MockServer::start().await;
    expect_submit(&server, "cached", 200, 1).await;

    let sandbox = tempfile::tempdir().unwrap();
    let token_path = sandbox.path().join("token");
    std::fs::write(&token_path, "cached").unwrap();
    let config_path = sandbox.path().join("questhook.json");
    std::fs::write(
        &config_path,
        serde_json::json!({
            // the deployments dir does not exist; --contract supplies the record
            "serviceUrl": server.uri(),
            "tokenPath": token_path,
            "challengeSlug": "dex-01"
        })
        .to_string(),
    )
    .unwrap();

    questhook_cmd(sandbox.path())
        .arg("--config")
        .arg(&config_path)
        .args(["--chain-id", "11155111", "--contract", "Dex=0xabc", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"chainId\": 11155111"))
        .stdout(predicate::str::contains("\"Dex\""));
}

/// C6: server error is fatal with the status text
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn report_server_error_fails() {
    let server = MockServer::start().await;
    expect_any_submit(&server, 500, 1).await;

    let sandbox = tempfile::tempdir().unwrap();
    common::write_hardhat_deployments(&sandbox.path().join("deployments"));
    let token_path = sandbox.path().join("token");
    std::fs::write(&token_path, "cached").unwrap();

    questhook_cmd(sandbox.path())
        .args(["report", "--service-url", server.uri().as_str(), "--token-path"])
        .arg(&token_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to update server: Internal Server Error",
        ));
}

/// C7: --json errors are structured on stdout
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn report_json_error_output() {
    let server = MockServer::start().await;
    expect_any_submit(&server, 502, 1).await;

    let sandbox = tempfile::tempdir().unwrap();
    common::write_hardhat_deployments(&sandbox.path().join("deployments"));
    let token_path = sandbox.path().join("token");
    std::fs::write(&token_path, "cached").unwrap();

    questhook_cmd(sandbox.path())
        .args(["report", "--json", "--service-url", server.uri().as_str(), "--token-path"])
        .arg(&token_path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"report_rejected\""))
        .stdout(predicate::str::contains("502"));
}

/// C8: malformed --contract is rejected before anything is sent
#[test]
fn report_rejects_malformed_contract() {
    let sandbox = tempfile::tempdir().unwrap();
    questhook_cmd(sandbox.path())
        .args(["report", "--chain-id", "1", "--contract", "Greeter"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot parse contract"));
}

/// C9: missing deployments directory is reported clearly
#[test]
fn report_without_deployments_fails() {
    let sandbox = tempfile::tempdir().unwrap();
    questhook_cmd(sandbox.path())
        .args(["report", "--chain-id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read deployments"));
}

/// C10: explicit --config that does not exist is an error
#[test]
fn missing_config_file_errors() {
    let sandbox = tempfile::tempdir().unwrap();
    questhook_cmd(sandbox.path())
        .args(["status", "--config", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

/// C11: with --json the browser prompt goes to stderr and stdout stays parseable
#[test]
fn json_mode_keeps_auth_prompt_off_stdout() {
    let sandbox = tempfile::tempdir().unwrap();
    common::write_hardhat_deployments(&sandbox.path().join("deployments"));

    let output = questhook_cmd(sandbox.path())
        .args([
            "report",
            "--json",
            "--no-browser",
            "--auth-timeout",
            "1",
            "--service-url",
            "http://127.0.0.1:1",
            "--token-path",
        ])
        .arg(sandbox.path().join("token"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout["error"]["code"], "timeout");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("please open it manually"));
    assert!(stderr.contains("http://127.0.0.1:1/auth?r="));
}

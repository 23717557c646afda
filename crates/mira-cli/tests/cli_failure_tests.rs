use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;

/// Run in an empty directory with no key in the environment
fn isolated(mut cmd: Command, dir: &tempfile::TempDir) -> Command {
    cmd.current_dir(dir.path())
        .env_remove("API_KEY")
        .env_remove("MIRA_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn stderr_report(stderr: &[u8]) -> Value {
    let text = String::from_utf8_lossy(stderr);
    let line = text.lines().last().unwrap_or_default();
    serde_json::from_str(line).unwrap_or_else(|err| panic!("stderr is not JSON ({}): {}", err, text))
}

#[test]
fn deploy_without_api_key_reports_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let assert = isolated(cargo_bin_cmd!("mira-deploy"), &dir).assert().failure().code(1);

    let report = stderr_report(&assert.get_output().stderr);
    assert_eq!(report["error"], "Failed to configure Mira client");
    assert!(report["details"].as_str().unwrap().contains("API_KEY"));
}

#[test]
fn deploy_with_missing_flow_file_reports_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated(cargo_bin_cmd!("mira-deploy"), &dir);
    cmd.env("API_KEY", "test-key").args(["--flow", "absent.yaml"]);

    let assert = cmd.assert().failure().code(1).stderr(contains("absent.yaml"));
    let report = stderr_report(&assert.get_output().stderr);
    assert_eq!(report["error"], "Failed to load flow from absent.yaml");
}

#[test]
fn test_flow_rejects_invalid_json_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated(cargo_bin_cmd!("mira-test-flow"), &dir);
    cmd.arg("{not json");

    let assert = cmd.assert().failure().code(1);
    let report = stderr_report(&assert.get_output().stderr);
    assert_eq!(report["error"], "Invalid JSON input");
    assert!(report.get("details").is_some());
}

#[test]
fn test_flow_without_input_reports_usage() {
    let dir = tempfile::tempdir().unwrap();
    let assert = isolated(cargo_bin_cmd!("mira-test-flow"), &dir)
        .assert()
        .failure()
        .code(1);

    let report = stderr_report(&assert.get_output().stderr);
    assert!(report["error"].as_str().unwrap().starts_with("Usage: mira-test-flow"));
}

// ABOUTME: Integration tests for the shipctl CLI commands.
// ABOUTME: Validates --help output, argument errors, and local-only failures before any API call.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn shipctl_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("shipctl"));
    cmd.env_remove("RUST_LOG")
        .env_remove("SHIPCTL_SLACK_WEBHOOK_URL")
        .env("AWS_REGION", "us-east-1")
        .env("AWS_EC2_METADATA_DISABLED", "true");
    cmd
}

#[test]
fn help_shows_commands() {
    shipctl_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("rollback"))
        .stdout(predicate::str::contains("oneshot"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn missing_cluster_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();

    shipctl_cmd()
        .current_dir(temp_dir.path())
        .args(["deploy", "--service-name", "api"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--cluster is required"));
}

#[test]
fn missing_region_fails_before_any_api_call() {
    let temp_dir = tempfile::tempdir().unwrap();

    shipctl_cmd()
        .current_dir(temp_dir.path())
        .env_remove("AWS_REGION")
        .env_remove("AWS_DEFAULT_REGION")
        .args(["rollback", "--cluster", "prod", "--service-name", "api"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("AWS region is not found"));
}

#[test]
fn cluster_can_come_from_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("shipctl.yml"), "cluster: prod\n").unwrap();

    shipctl_cmd()
        .current_dir(temp_dir.path())
        .env_remove("AWS_REGION")
        .env_remove("AWS_DEFAULT_REGION")
        .args(["deploy", "--service-name", "api"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("AWS region is not found"));
}

#[test]
fn malformed_image_selector_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();

    shipctl_cmd()
        .current_dir(temp_dir.path())
        .args([
            "deploy",
            "--cluster",
            "prod",
            "--service-name",
            "api",
            "--image",
            "team/api",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid image selector"));
}

#[test]
fn invalid_service_name_is_rejected() {
    shipctl_cmd()
        .args(["rollback", "--cluster", "prod", "--service-name", "my api"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--service-name"));
}

#[test]
fn oneshot_requires_a_task_source() {
    shipctl_cmd()
        .args(["oneshot", "--cluster", "prod", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--taskdef-name"));
}

#[test]
fn oneshot_rejects_both_task_sources() {
    shipctl_cmd()
        .args([
            "oneshot",
            "--cluster",
            "prod",
            "--taskdef-name",
            "migrate",
            "--service-name",
            "api",
            "true",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn oneshot_requires_a_command() {
    shipctl_cmd()
        .args(["oneshot", "--cluster", "prod", "--taskdef-name", "migrate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("COMMAND"));
}

#[test]
fn history_reads_the_file_backend() {
    let temp_dir = tempfile::tempdir().unwrap();
    let history_dir = temp_dir.path().join(".shipctl/history");
    fs::create_dir_all(&history_dir).unwrap();
    fs::write(
        history_dir.join("deploy-state.prod.api.json"),
        r#"[{"revision":6,"status":2,"cause":"deploy: 5 -> 6"},{"revision":7,"status":1,"cause":"deploy: 6 -> 7"}]"#,
    )
    .unwrap();

    shipctl_cmd()
        .current_dir(temp_dir.path())
        .args([
            "history",
            "--cluster",
            "prod",
            "--backend",
            "file",
            "--service-name",
            "api",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("REVISION"))
        .stdout(predicate::str::contains("deploy: 6 -> 7"))
        .stdout(predicate::str::contains("pending"));
}

#[test]
fn history_lists_recorded_services_as_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let history_dir = temp_dir.path().join(".shipctl/history");
    fs::create_dir_all(&history_dir).unwrap();
    fs::write(history_dir.join("deploy-state.prod.api.json"), "[]").unwrap();

    shipctl_cmd()
        .current_dir(temp_dir.path())
        .args(["--json", "history", "--cluster", "prod", "--backend", "file"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"["prod/api"]"#));
}

#[test]
fn unknown_backend_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();

    shipctl_cmd()
        .current_dir(temp_dir.path())
        .args(["history", "--cluster", "prod", "--backend", "dynamodb"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown history backend"));
}

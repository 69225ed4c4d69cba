//! End-to-end tests for the `secretsctl` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SECRETSFILE: &str = "\
# application secrets
db {
    path apps/db
    region us-east-1
}

api {
    path apps/api
    region eu-west-2
}
";

const STORE: &str = r#"{
    "apps/db": {"username": "app", "password": "p1"},
    "apps/api": {"token": "t-123"}
}"#;

fn fixture() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("Secretsfile");
    let store = dir.path().join("store.json");
    std::fs::write(&config, SECRETSFILE).expect("write config");
    std::fs::write(&store, STORE).expect("write store");
    (dir, config, store)
}

fn secretsctl() -> Command {
    let mut cmd = Command::cargo_bin("secretsctl").expect("binary built");
    cmd.env_remove("SECRETSCTL_FORMAT").env_remove("SECRETSCTL_STORE");
    cmd
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn test_check_lists_secrets() {
    let (_dir, config, _store) = fixture();
    secretsctl()
        .args(["check", arg(&config)])
        .assert()
        .success()
        .stdout(predicate::str::contains("apps/db"))
        .stdout(predicate::str::contains("2 secret(s) OK"));
}

#[test]
fn test_check_json_format_from_env() {
    let (_dir, config, _store) = fixture();
    secretsctl()
        .env("SECRETSCTL_FORMAT", "json")
        .args(["check", arg(&config)])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "api""#));
}

#[test]
fn test_check_reports_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("Secretsfile");
    std::fs::write(&config, "db {\n    path apps/db\n    region us-east-1 extra\n}\n").expect("write");

    secretsctl()
        .args(["check", arg(&config)])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(":3 - Error during parsing"))
        .stderr(predicate::str::contains("has invalid syntax"));
}

#[test]
fn test_show_masks_by_default() {
    let (_dir, config, store) = fixture();
    secretsctl()
        .args(["--store", arg(&store), "show", arg(&config), "db"])
        .assert()
        .success()
        .stdout(predicate::str::contains("password"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("p1").not());
}

#[test]
fn test_show_reveals_key_with_store_from_env() {
    let (_dir, config, store) = fixture();
    secretsctl()
        .env("SECRETSCTL_STORE", arg(&store))
        .args(["show", arg(&config), "api", "--key", "token", "--reveal"])
        .assert()
        .success()
        .stdout("t-123\n");
}

#[test]
fn test_show_missing_key_fails() {
    let (_dir, config, store) = fixture();
    secretsctl()
        .args(["--store", arg(&store), "show", arg(&config), "db", "--key", "token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#"key "token" not found in secret "db""#));
}

#[test]
fn test_show_requires_store() {
    let (_dir, config, _store) = fixture();
    secretsctl()
        .args(["show", arg(&config), "db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--store"));
}

//! End-to-end CLI tests for the sitedata binary.

use assert_cmd::Command;
use predicates::prelude::*;

const CONFIG_VARS: [&str; 6] = [
    "SHEETS_API_URL",
    "SHEETS_API_TOKEN",
    "MEDIA_CLOUD_NAME",
    "MEDIA_API_KEY",
    "MEDIA_API_SECRET",
    "MEDIA_API_BASE_URL",
];

/// Binary with every configuration variable cleared.
fn unconfigured() -> Command {
    let mut cmd = Command::cargo_bin("sitedata").unwrap();
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    unconfigured()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("content sheets"));
}

#[test]
fn test_binary_version_displays_version() {
    unconfigured()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitedata"));
}

#[test]
fn test_list_without_backend_prints_empty_array() {
    unconfigured()
        .args(["list", "blog"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_strict_list_without_backend_fails() {
    unconfigured()
        .args(["list", "events", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_get_without_backend_prints_null() {
    unconfigured()
        .args(["get", "brochures", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::diff("null\n"));
}

#[test]
fn test_sign_upload_without_credentials_fails() {
    unconfigured()
        .args(["sign-upload", "--folder", "gallery"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("media host credentials are not configured"));
}

#[test]
fn test_sign_upload_prints_signature_json() {
    unconfigured()
        .env("MEDIA_CLOUD_NAME", "demo")
        .env("MEDIA_API_KEY", "1234")
        .env("MEDIA_API_SECRET", "s3cr3t-value")
        .args(["sign-upload", "--folder", "brochures", "--kind", "raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"signature\""))
        .stdout(predicate::str::contains("/demo/raw/upload"))
        .stdout(predicate::str::contains("s3cr3t-value").not());
}

#[test]
fn test_invalid_backend_url_fails() {
    unconfigured()
        .env("SHEETS_API_URL", "not a url")
        .args(["list", "blog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SHEETS_API_URL"));
}

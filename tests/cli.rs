//! Tests for the devguard binary
//!
//! Runs the built executable and checks exit codes and what lands on stdout.
//! Each test works in its own temporary directory holding an empty
//! `.devguard.toml`, so no user configuration is picked up.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".devguard.toml"), "").unwrap();
    dir
}

fn devguard(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_devguard"))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn missing_command_prints_usage_and_exits_2() {
    let dir = workspace();
    let output = devguard(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn unknown_command_prints_usage_and_exits_2() {
    let dir = workspace();
    let output = devguard(dir.path(), &["frobnicate"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!output.stdout.is_empty());
}

#[test]
fn missing_argument_exits_2() {
    let dir = workspace();
    let output = devguard(dir.path(), &["add"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!output.stdout.is_empty());
}

#[test]
fn hash_prints_token() {
    let dir = workspace();
    let output = devguard(dir.path(), &["hash", "abc-123&0&1"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("ABC-123"));
    assert!(text.contains("013935F88C636896"));
}

#[test]
fn add_then_check_on_file_store() {
    let dir = workspace();
    let store = dir.path().join("store");
    let store = store.to_str().unwrap();

    let output = devguard(dir.path(), &["--store-dir", store, "check", "XYZ"]);
    assert_eq!(output.status.code(), Some(3));

    let output = devguard(dir.path(), &["--store-dir", store, "add", "XYZ"]);
    assert_eq!(output.status.code(), Some(0));

    let output = devguard(dir.path(), &["--store-dir", store, "check", "xyz&1"]);
    assert_eq!(output.status.code(), Some(0));

    let output = devguard(dir.path(), &["--store-dir", store, "-f", "json", "list"]);
    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["count"], 1);
    assert_eq!(report["entries"][0], "92EF91A813A3E480");
}

#[test]
fn relative_service_name_is_config_error() {
    let dir = workspace();
    let store = dir.path().join("store");
    let output = devguard(
        dir.path(),
        &["--store-dir", store.to_str().unwrap(), "add", "XYZ", ".."],
    );
    assert_eq!(output.status.code(), Some(12));
    assert!(!store.exists());
}

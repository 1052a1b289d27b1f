#![cfg(feature = "cli")]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;

const SIGNUP_SCHEMA: &str = r#"{
    "email": {"type": "email", "required": true},
    "age": {"type": "number", "min": 18},
    "role": {"type": "enum", "enum": ["admin", "user"]}
}"#;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "paramkit-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("fixture should be writable");
    path
}

fn check(schema: &Path, values: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_paramkit"))
        .args(["--format", "json", "check"])
        .arg(values)
        .arg("--schema")
        .arg(schema)
        .args(extra)
        .output()
        .expect("check should run")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn valid_values_exit_zero() {
    let dir = unique_temp_dir("valid");
    let schema = write(&dir, "signup.json", SIGNUP_SCHEMA);
    let values = write(&dir, "values.json", r#"{"email": "ada@example.com", "age": 36}"#);

    let output = check(&schema, &values, &[]);
    assert_eq!(output.status.code(), Some(0));
    let report = stdout_json(&output);
    assert_eq!(report["valid"], Value::Bool(true));
    assert_eq!(report["status"], 200);
    assert!(report.get("error").is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn first_violation_is_reported_with_exit_60() {
    let dir = unique_temp_dir("invalid");
    let schema = write(&dir, "signup.json", SIGNUP_SCHEMA);
    let values = write(&dir, "values.json", r#"{"email": "ada@example.com", "age": 12}"#);

    let output = check(&schema, &values, &[]);
    assert_eq!(output.status.code(), Some(60));
    let report = stdout_json(&output);
    assert_eq!(report["valid"], Value::Bool(false));
    assert_eq!(report["status"], 400);
    assert_eq!(report["error"]["error"], "INVALID_PARAMS");
    assert_eq!(report["error"]["error_code"], 40001);
    assert_eq!(report["error"]["message"], "Parameter (age) must be >= 18, got 12");
    assert_eq!(report["error"]["info"]["field"], "age");
    assert_eq!(report["error"]["info"]["rule"], "bounds_violation");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn allowed_mode_rejects_undeclared_keys() {
    let dir = unique_temp_dir("allowed");
    let schema = write(&dir, "signup.json", SIGNUP_SCHEMA);
    let values = write(&dir, "values.json", r#"{"role": "user", "admin": true}"#);

    let output = check(&schema, &values, &["--mode", "allowed"]);
    assert_eq!(output.status.code(), Some(60));
    assert_eq!(
        stdout_json(&output)["error"]["message"],
        "Parameter (admin) is not allowed"
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn values_can_come_from_stdin() {
    let dir = unique_temp_dir("stdin");
    let schema = write(&dir, "signup.json", SIGNUP_SCHEMA);

    let mut child = Command::new(env!("CARGO_BIN_EXE_paramkit"))
        .args(["--format", "pretty", "check", "-", "--schema"])
        .arg(&schema)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("check should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(br#"{"email": "not-an-email"}"#)
        .expect("stdin should accept values");
    let output = child.wait_with_output().expect("check should finish");

    assert_eq!(output.status.code(), Some(60));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("invalid:"));
    assert!(stdout.contains("Parameter (email) is not a valid email"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_inputs_are_data_errors() {
    let dir = unique_temp_dir("malformed");
    let schema = write(&dir, "signup.json", SIGNUP_SCHEMA);
    let array = write(&dir, "array.json", "[1, 2]");
    let bad_schema = write(&dir, "bad.json", r#"{"x": {"type": "date"}}"#);

    let output = check(&schema, &array, &[]);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected a JSON object"));

    let output = check(&bad_schema, &array, &[]);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid definition for field x"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_and_bad_usage_exit_64() {
    let dir = unique_temp_dir("usage");
    let schema = write(&dir, "signup.json", SIGNUP_SCHEMA);

    let output = check(&schema, &dir.join("nope.json"), &[]);
    assert_eq!(output.status.code(), Some(64));

    let output = Command::new(env!("CARGO_BIN_EXE_paramkit"))
        .args(["check", "values.json"])
        .output()
        .expect("check should run");
    assert_eq!(output.status.code(), Some(64));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_paramkit"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("paramkit {}", env!("CARGO_PKG_VERSION"))
    );
}

#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "paramkit-registry-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn schema_dir(tag: &str) -> PathBuf {
    let dir = unique_temp_dir(tag);
    std::fs::write(
        dir.join("order.create.schema.json"),
        r#"{"sku": {"type": "string", "required": true, "min": 3}, "qty": {"type": "number", "required": true}}"#,
    )
    .expect("schema should be writable");
    std::fs::write(
        dir.join("ping.schema.json"),
        r#"{"echo": {"type": "string", "nullable": true}}"#,
    )
    .expect("schema should be writable");
    std::fs::write(dir.join("README.md"), "not a schema").expect("readme should be writable");
    dir
}

fn write_values(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("values.json");
    std::fs::write(&path, content).expect("values should be writable");
    path
}

fn registry(dir: &Path, action: &str, values: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_paramkit"))
        .args(["--format", "json", "registry", action])
        .arg(values)
        .arg("--dir")
        .arg(dir)
        .args(extra)
        .output()
        .expect("registry should run")
}

#[test]
fn action_schema_is_applied() {
    let dir = schema_dir("apply");
    let values = write_values(&dir, r#"{"sku": "ab", "qty": 2}"#);

    let output = registry(&dir, "order.create", &values, &[]);
    assert_eq!(output.status.code(), Some(60));
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["target"], "order.create");
    assert_eq!(
        report["error"]["message"],
        "Parameter (sku) length must be >= 3, got 2"
    );

    let values = write_values(&dir, r#"{"sku": "abc", "qty": 2, "note": "x"}"#);
    assert_eq!(registry(&dir, "order.create", &values, &[]).status.code(), Some(0));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn strict_flag_rejects_undeclared_keys_first() {
    let dir = schema_dir("strict");
    let values = write_values(&dir, r#"{"note": "x"}"#);

    let output = registry(&dir, "order.create", &values, &["--strict"]);
    assert_eq!(output.status.code(), Some(60));
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["mode"], "both");
    assert_eq!(report["error"]["message"], "Parameter (note) is not allowed");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_action_is_usage_error() {
    let dir = schema_dir("unknown");
    let values = write_values(&dir, "{}");

    let output = registry(&dir, "order.refund", &values, &[]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no schema registered for order.refund"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn schema_dir_falls_back_to_env() {
    let dir = schema_dir("env");
    let values = write_values(&dir, r#"{"echo": null}"#);

    let output = Command::new(env!("CARGO_BIN_EXE_paramkit"))
        .args(["--format", "json", "registry", "ping"])
        .arg(&values)
        .env("PARAMKIT_SCHEMA_DIR", &dir)
        .output()
        .expect("registry should run");
    assert_eq!(output.status.code(), Some(0));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn actions_lists_registered_schemas() {
    let dir = schema_dir("actions");

    let output = Command::new(env!("CARGO_BIN_EXE_paramkit"))
        .args(["--format", "json", "actions", "--dir"])
        .arg(&dir)
        .output()
        .expect("actions should run");
    assert!(output.status.success());

    let listing: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let actions = listing["actions"].as_array().expect("actions should be an array");
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0]["action"], "order.create");
    assert_eq!(actions[0]["fields"], serde_json::json!(["sku", "qty"]));
    assert_eq!(actions[1]["action"], "ping");

    let _ = std::fs::remove_dir_all(&dir);
}

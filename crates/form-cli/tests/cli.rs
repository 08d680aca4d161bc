use assert_cmd::Command;
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const GOODS_SCHEMA: &str = include_str!("../../form-model/tests/fixtures/goods_form.json");

fn form_model() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_form-model"));
    cmd.env_remove("FORM_MODEL_MESSAGES");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn goods_values() -> Value {
    json!({
        "name": "iPhone16Pro",
        "skus": [{ "name": "512G", "number": 10, "price": 1888 }]
    })
}

#[test]
fn validate_succeeds_for_complete_values() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", GOODS_SCHEMA);
    let values = write(&dir, "values.json", &goods_values().to_string());

    let output = form_model()
        .args(["validate", "--format", "json", "--schema"])
        .arg(&schema)
        .arg("--values")
        .arg(&values)
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(parsed["valid"], true);
    assert_eq!(parsed["values"]["name"], "iPhone16Pro");
    assert_eq!(parsed["values"]["skus"][0]["price"], 1888);
}

#[test]
fn validate_exits_one_and_uses_messages_from_env() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", GOODS_SCHEMA);
    let values = write(&dir, "values.json", "{}");
    let messages = write(
        &dir,
        "messages.json",
        r#"{"required": "{{label}} is required"}"#,
    );

    let output = form_model()
        .args(["validate", "--schema"])
        .arg(&schema)
        .arg("--values")
        .arg(&values)
        .env("FORM_MODEL_MESSAGES", &messages)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Status: invalid"));
    assert!(stdout.contains("name: 名称 is required"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed with 2 error(s)"));
}

#[test]
fn validate_exits_two_when_values_are_missing() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", GOODS_SCHEMA);

    let output = form_model()
        .args(["validate", "--schema"])
        .arg(&schema)
        .arg("--values")
        .arg(dir.path().join("absent.json"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: "));
}

#[test]
fn check_rejects_duplicate_names() {
    let dir = TempDir::new().unwrap();
    let mut schema: Value = serde_json::from_str(GOODS_SCHEMA).unwrap();
    let first = schema["root"]["fields"][0].clone();
    schema["root"]["fields"].as_array_mut().unwrap().push(first);
    let path = write(&dir, "schema.json", &schema.to_string());

    let output = form_model()
        .args(["check", "--schema"])
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("more than once"));
}

#[test]
fn check_accepts_goods_schema() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "schema.json", GOODS_SCHEMA);

    let output = form_model()
        .args(["check", "--schema"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("is well formed"));
}

#[test]
fn schema_prints_document_schema() {
    let output = form_model().arg("schema").output().unwrap();
    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(parsed["title"], "FormSchema");
}

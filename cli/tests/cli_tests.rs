//! CLI binary integration tests using assert_cmd + predicates.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("contract-graph").expect("binary should exist")
}

fn message_contracts() -> String {
    serde_json::json!([{
        "slug": "message",
        "version": "1.0.0",
        "schema": {
            "type": "object",
            "properties": {
                "data": {
                    "type": "object",
                    "properties": { "payload": { "type": "string" } },
                    "required": ["payload"]
                }
            }
        }
    }])
    .to_string()
}

// ── Compile to Stdout ───────────────────────────────────────────────────────

#[test]
fn test_compile_sdl_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("contracts.json");
    fs::write(&input, message_contracts()).unwrap();

    cmd()
        .args(["compile", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("interface Card {"))
        .stdout(predicate::str::contains(
            "type MessageV1_0_0 implements Card {",
        ))
        .stdout(predicate::str::contains("payload: String!"));
}

// ── Compile to File ─────────────────────────────────────────────────────────

#[test]
fn test_compile_json_to_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("contracts.json");
    let output = dir.path().join("schema.json");
    fs::write(&input, message_contracts()).unwrap();

    cmd()
        .args(["compile", input.to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .args(["--format", "json"])
        .assert()
        .success();

    let content = fs::read_to_string(&output).expect("output file should exist");
    let schema: serde_json::Value =
        serde_json::from_str(&content).expect("output should be valid JSON");
    assert_eq!(schema["card_interface"], serde_json::json!("Card"));
    assert_eq!(
        schema["card_types"]["message@1.0.0"],
        serde_json::json!("MessageV1_0_0")
    );
}

// ── Options ─────────────────────────────────────────────────────────────────

#[test]
fn test_no_base_card_flag() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("contracts.json");
    fs::write(&input, message_contracts()).unwrap();

    cmd()
        .args(["compile", input.to_str().unwrap(), "--no-base-card"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interface Card").not())
        .stdout(predicate::str::contains("type MessageV1_0_0 {"));
}

#[test]
fn test_max_depth_flag() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("contracts.json");
    fs::write(&input, message_contracts()).unwrap();

    cmd()
        .args(["compile", input.to_str().unwrap(), "--max-depth", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"code\":\"depth_exceeded\""));
}

// ── Resolve ─────────────────────────────────────────────────────────────────

#[test]
fn test_resolve_card_value() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("contracts.json");
    let value = dir.path().join("card.json");
    fs::write(&input, message_contracts()).unwrap();
    fs::write(
        &value,
        serde_json::json!({ "type": "message@1.0.0", "data": { "payload": "hi" } }).to_string(),
    )
    .unwrap();

    cmd()
        .args(["resolve", input.to_str().unwrap()])
        .args(["--value", value.to_str().unwrap()])
        .assert()
        .success()
        .stdout("MessageV1_0_0\n");
}

#[test]
fn test_resolve_unknown_type_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("contracts.json");
    let value = dir.path().join("card.json");
    fs::write(&input, message_contracts()).unwrap();
    fs::write(&value, r#"{ "type": "message@9.9.9" }"#).unwrap();

    cmd()
        .args(["resolve", input.to_str().unwrap()])
        .args(["--value", value.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MessageV9_9_9"));
}

// ── Invalid Input ───────────────────────────────────────────────────────────

#[test]
fn test_invalid_input() {
    cmd()
        .args(["compile", "/nonexistent/path/contracts.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open input file"));
}

#[test]
fn test_malformed_contracts_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("contracts.json");
    fs::write(&input, r#"{ "slug": "not-an-array" }"#).unwrap();

    cmd()
        .args(["compile", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse contracts"));
}

#[test]
fn test_compile_error_is_reported_with_code_and_path() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("contracts.json");
    fs::write(
        &input,
        serde_json::json!([{
            "slug": "broken",
            "version": "1.0.0",
            "schema": {
                "type": "object",
                "properties": { "ref": { "$ref": "#/definitions/x" } }
            }
        }])
        .to_string(),
    )
    .unwrap();

    cmd()
        .args(["compile", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "\"code\":\"unsupported_reference\"",
        ))
        .stderr(predicate::str::contains(
            "broken@1.0.0#/data/schema/properties/ref",
        ));
}

// ── Help Output ─────────────────────────────────────────────────────────────

#[test]
fn test_help_output() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_compile_help() {
    cmd()
        .args(["compile", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--max-depth"))
        .stdout(predicate::str::contains("--no-base-card"));
}

//! Command-line behaviour of the `schema-deref` binary.

#![cfg(feature = "cli")]

use pretty_assertions::assert_eq;
use schema_deref::config::CONFIG_ENV_VAR;
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Binary with a clean environment: no config file, no log output.
fn schema_deref() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_schema-deref"));
    command.env_remove(CONFIG_ENV_VAR).env("RUST_LOG", "off");
    command
}

fn run(command: &mut Command) -> Output {
    let output = command.output().expect("failed to run schema-deref");
    assert!(
        output.status.success(),
        "schema-deref failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_resolves_schema_against_itself() {
    let output = run(schema_deref().arg(fixture("circular.json")));
    let out = stdout_json(&output);

    let root = &out["properties"]["root"];
    assert_eq!(root["properties"]["value"], json!({ "type": "string" }));
    assert_eq!(root["__inheritedFrom"]["ref"], json!("#/definitions/Node"));
    assert_eq!(
        root["properties"]["parent"]["properties"]["node"]["type"],
        json!("@circular")
    );
}

#[test]
fn test_yaml_output_matches_json_output() {
    let json_out = stdout_json(&run(schema_deref().arg(fixture("circular.json"))));

    let output = run(schema_deref()
        .arg(fixture("circular.json"))
        .args(["--format", "yaml"]));
    let yaml_out: Value = serde_yaml::from_slice(&output.stdout).expect("stdout is not YAML");

    assert_eq!(yaml_out, json_out);
}

#[test]
fn test_summary_goes_to_stderr() {
    let output = run(schema_deref().arg(fixture("circular.json")).arg("--summary"));

    // stdout stays a plain document
    assert!(stdout_json(&output).get("circular_count").is_none());

    let summary: Value = serde_json::from_slice(&output.stderr).expect("stderr is not JSON");
    assert_eq!(summary["unresolved_refs"], json!([]));
    assert!(summary["circular_count"].as_u64().unwrap() >= 1);
    assert_eq!(summary["circular_refs"], json!(["#/definitions/Node"]));
}

#[test]
fn test_definitions_file_with_pointer() {
    let schema = temp_file(
        ".json",
        r##"{ "type": "object", "properties": { "pet": { "$ref": "#/Pet" } } }"##,
    );

    let output = run(schema_deref()
        .arg(schema.path())
        .arg("--definitions-file")
        .arg(fixture("openapi.json"))
        .args(["--definitions", "/components/schemas"]));
    let out = stdout_json(&output);

    let pet = &out["properties"]["pet"];
    assert_eq!(pet["type"], json!("object"));
    assert_eq!(pet["properties"]["id"], json!({ "type": "integer" }));
    assert_eq!(pet["__inheritedFrom"]["ref"], json!("#/Pet"));
}

#[test]
fn test_missing_definitions_pointer_fails() {
    let output = schema_deref()
        .arg(fixture("openapi.json"))
        .args(["--definitions", "/nope"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_config_file_from_env() {
    let config = temp_file(".yaml", "hide_inherited_from: true\n");

    let output = run(schema_deref()
        .arg(fixture("circular.json"))
        .env(CONFIG_ENV_VAR, config.path()));
    let rendered = String::from_utf8(output.stdout).unwrap();

    assert!(!rendered.contains("__inheritedFrom"));
    assert!(rendered.contains("@circular"));
}

#[test]
fn test_flag_overrides_config_file() {
    let config = temp_file(".yaml", "definitions: /missing\n");
    let schema = temp_file(
        ".json",
        r##"{ "properties": { "tag": { "$ref": "#/Tag" } } }"##,
    );

    // the file value alone points nowhere
    let output = schema_deref()
        .arg(schema.path())
        .arg("--definitions-file")
        .arg(fixture("openapi.json"))
        .arg("--config")
        .arg(config.path())
        .output()
        .unwrap();
    assert!(!output.status.success());

    let output = run(schema_deref()
        .arg(schema.path())
        .arg("--definitions-file")
        .arg(fixture("openapi.json"))
        .arg("--config")
        .arg(config.path())
        .args(["--definitions", "/components/schemas"]));
    let out = stdout_json(&output);

    assert_eq!(out["properties"]["tag"]["type"], json!("string"));
}

//! CLI regression tests for the `cartograph` binary.
//!
//! These invoke the binary as a subprocess to catch regressions in flag
//! names, exit codes and output formats.
//!
//! Run with: `cargo test -p cartograph-test`
//! Requires the `cartograph` binary to be built first (`cargo build -p cartograph`).

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use crate::fixtures;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns an assert_cmd Command wrapping the `cartograph` binary, with
/// logging environment cleared so output is deterministic.
fn cartograph() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("cartograph")
        .expect("cartograph binary not found, run `cargo build -p cartograph` first");
    cmd.env_remove("RUST_LOG")
        .env_remove("CARTOGRAPH_LOG_LEVEL")
        .env_remove("CARTOGRAPH_LOG_FORMAT")
        .env_remove("CARTOGRAPH_HTTP_TIMEOUT");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().get_output().stdout.clone();
    let s = String::from_utf8(output).expect("stdout should be valid UTF-8");
    serde_json::from_str(&s).expect("output should be valid JSON")
}

// ---------------------------------------------------------------------------
// cartograph version / usage
// ---------------------------------------------------------------------------

#[test]
fn version_prints_package_version() {
    cartograph()
        .arg("version")
        .assert()
        .success()
        .stdout(contains(concat!("cartograph ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    cartograph().arg("frobnicate").assert().failure().code(2);
}

#[test]
fn missing_source_is_usage_error() {
    cartograph().arg("inspect").assert().failure().code(2);
}

#[test]
fn bad_log_format_is_usage_error() {
    cartograph()
        .args(["--log-format", "xml", "version"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("unknown log format"));
}

// ---------------------------------------------------------------------------
// cartograph inspect
// ---------------------------------------------------------------------------

#[test]
fn inspect_summarizes_document() {
    cartograph()
        .arg("inspect")
        .arg(fixtures().join("petstore.yaml"))
        .assert()
        .success()
        .stdout(contains("Petstore"))
        .stdout(contains("1.2.0"))
        .stdout(predicate::str::is_match(r"paths:\s+2\n").unwrap())
        .stdout(predicate::str::is_match(r"operations:\s+3\n").unwrap())
        .stdout(predicate::str::is_match(r"schemas:\s+5\n").unwrap())
        .stdout(predicate::str::is_match(r"responses:\s+2\n").unwrap());
}

#[test]
fn inspect_counts_webhooks() {
    cartograph()
        .arg("inspect")
        .arg(fixtures().join("petstore.json"))
        .assert()
        .success()
        .stdout(contains("3.1.0"))
        .stdout(predicate::str::is_match(r"webhooks:\s+1\n").unwrap())
        .stdout(predicate::str::is_match(r"operations:\s+2\n").unwrap());
}

#[test]
fn inspect_swagger2_maps_definitions() {
    cartograph()
        .arg("inspect")
        .arg(fixtures().join("swagger2.yaml"))
        .assert()
        .success()
        .stdout(contains("2.0"))
        .stdout(predicate::str::is_match(r"schemas:\s+2\n").unwrap());
}

#[test]
fn inspect_missing_file_exits_one() {
    cartograph()
        .args(["inspect", "this-file-does-not-exist.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("error: failed to load"))
        .stderr(contains("E2101"));
}

#[test]
fn inspect_parse_error_exits_one() {
    cartograph()
        .arg("inspect")
        .arg(fixtures().join("invalid-parse-error.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2103"));
}

#[test]
fn inspect_list_root_exits_one() {
    cartograph()
        .arg("inspect")
        .arg(fixtures().join("list-root.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2105"));
}

#[test]
fn inspect_missing_required_field_exits_one() {
    cartograph()
        .arg("inspect")
        .arg(fixtures().join("missing-title.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2001"))
        .stderr(contains("title"));
}

#[test]
fn inspect_reads_unlabelled_files() {
    let mut file = tempfile::Builder::new()
        .suffix(".spec")
        .tempfile()
        .expect("temp file");
    file.write_all(b"openapi: 3.0.0\ninfo: {title: Bare, version: '0.1'}\npaths: {}\n")
        .expect("write spec");

    cartograph()
        .arg("inspect")
        .arg(file.path())
        .assert()
        .success()
        .stdout(contains("Bare"));
}

// ---------------------------------------------------------------------------
// cartograph refs
// ---------------------------------------------------------------------------

#[test]
fn refs_lists_every_occurrence_in_document_order() {
    let output = cartograph()
        .arg("refs")
        .arg(fixtures().join("petstore.yaml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf-8");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "#/components/parameters/Limit");
    assert_eq!(lines[1], "#/components/responses/PetList");
    assert_eq!(
        lines
            .iter()
            .filter(|l| **l == "#/components/schemas/Pet")
            .count(),
        4
    );
}

#[test]
fn refs_unique_json() {
    let refs = stdout_json(
        cartograph()
            .arg("refs")
            .arg(fixtures().join("petstore.yaml"))
            .args(["--unique", "--format", "json"]),
    );
    let refs = refs.as_array().expect("JSON array");
    assert_eq!(refs.len(), 7);
    assert!(refs.contains(&serde_json::json!("#/components/schemas/Owner")));
}

#[test]
fn refs_of_document_without_refs_is_empty() {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("temp file");
    file.write_all(br#"{"openapi": "3.0.0", "info": {"title": "T", "version": "1"}}"#)
        .expect("write spec");

    let refs = stdout_json(
        cartograph()
            .arg("refs")
            .arg(file.path())
            .args(["--format", "json"]),
    );
    assert_eq!(refs, serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// cartograph resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_component_schema_json() {
    let tree = stdout_json(
        cartograph()
            .arg("resolve")
            .arg(fixtures().join("petstore.yaml"))
            .arg("#/components/schemas/Owner"),
    );
    assert_eq!(
        tree,
        serde_json::json!({"type": "object", "properties": {"name": {"type": "string"}}})
    );
}

#[test]
fn resolve_follows_chains_and_nested_refs() {
    let tree = stdout_json(
        cartograph()
            .arg("resolve")
            .arg(fixtures().join("petstore.yaml"))
            .arg("#/components/schemas/PetAlias"),
    );
    let first = &tree["allOf"][0];
    assert_eq!(first["required"], serde_json::json!(["name"]));
    assert_eq!(first["properties"]["owner"]["type"], "object");
}

#[test]
fn resolve_no_follow_returns_immediate_target() {
    let tree = stdout_json(
        cartograph()
            .arg("resolve")
            .arg(fixtures().join("petstore.yaml"))
            .arg("#/components/schemas/PetAlias")
            .arg("--no-follow"),
    );
    assert_eq!(tree, serde_json::json!({"$ref": "#/components/schemas/Pet"}));
}

#[test]
fn resolve_yaml_output() {
    let output = cartograph()
        .arg("resolve")
        .arg(fixtures().join("petstore.yaml"))
        .arg("#/components/parameters/Limit")
        .args(["--format", "yaml"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let tree: serde_yaml::Value =
        serde_yaml::from_slice(&output).expect("output should be valid YAML");
    assert_eq!(tree["name"].as_str(), Some("limit"));
    assert_eq!(tree["in"].as_str(), Some("query"));
    assert_eq!(tree["schema"]["maximum"].as_u64(), Some(100));
}

#[test]
fn resolve_array_index() {
    let tree = stdout_json(
        cartograph()
            .arg("resolve")
            .arg(fixtures().join("petstore.yaml"))
            .arg("#/tags/1"),
    );
    assert_eq!(tree, serde_json::json!({"name": "owners"}));
}

#[test]
fn resolve_escaped_path_item() {
    let tree = stdout_json(
        cartograph()
            .arg("resolve")
            .arg(fixtures().join("petstore.yaml"))
            .arg("#/paths/~1pets~1{petId}")
            .arg("--no-follow"),
    );
    assert_eq!(tree["get"]["operationId"], "showPetById");
}

#[test]
fn resolve_swagger2_definition() {
    let tree = stdout_json(
        cartograph()
            .arg("resolve")
            .arg(fixtures().join("swagger2.yaml"))
            .arg("#/definitions/Pet"),
    );
    assert_eq!(tree["required"], serde_json::json!(["id", "name"]));
}

#[test]
fn resolve_missing_path_exits_one() {
    cartograph()
        .arg("resolve")
        .arg(fixtures().join("petstore.yaml"))
        .arg("#/components/invalid/path")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E3004"))
        .stderr(contains("/components/invalid"));
}

#[test]
fn resolve_bad_array_index_exits_one() {
    cartograph()
        .arg("resolve")
        .arg(fixtures().join("petstore.yaml"))
        .arg("#/tags/10")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E3005"));
}

#[test]
fn resolve_external_exits_one() {
    cartograph()
        .arg("resolve")
        .arg(fixtures().join("broken-ref.yaml"))
        .arg("#/components/schemas/Thing")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E3003"))
        .stderr(contains("common.yaml#/Thing"));
}

#[test]
fn resolve_circular_exits_one() {
    cartograph()
        .arg("resolve")
        .arg(fixtures().join("circular.yaml"))
        .arg("#/components/schemas/A")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E3002"))
        .stderr(contains(
            "#/components/schemas/A -> #/components/schemas/B -> #/components/schemas/A",
        ));
}

#[test]
fn resolve_self_referencing_schema_succeeds() {
    let tree = stdout_json(
        cartograph()
            .arg("resolve")
            .arg(fixtures().join("circular.yaml"))
            .arg("#/components/schemas/Node"),
    );
    assert_eq!(
        tree["properties"]["children"]["items"],
        serde_json::json!({"$ref": "#/components/schemas/Node"})
    );
}

// ---------------------------------------------------------------------------
// cartograph cycles
// ---------------------------------------------------------------------------

#[test]
fn cycles_clean_document_exits_zero() {
    cartograph()
        .arg("cycles")
        .arg(fixtures().join("petstore.yaml"))
        .assert()
        .success()
        .stdout(contains("checked 7 reference(s): 0 circular, 0 failed"));
}

#[test]
fn cycles_reports_circular_references() {
    cartograph()
        .arg("cycles")
        .arg(fixtures().join("circular.yaml"))
        .assert()
        .failure()
        .code(1)
        .stdout(contains("circular: #/components/schemas/A"))
        .stdout(contains("circular: #/components/schemas/B"))
        .stdout(contains("circular: #/components/schemas/Node").not());
}

#[test]
fn cycles_json_format() {
    let report = stdout_json(
        cartograph()
            .arg("cycles")
            .arg(fixtures().join("circular.yaml"))
            .args(["--format", "json"]),
    );
    assert_eq!(report["checked"], 3);
    assert_eq!(
        report["circular"],
        serde_json::json!(["#/components/schemas/B", "#/components/schemas/A"])
    );
    assert_eq!(report["failed"], serde_json::json!([]));
}

#[test]
fn cycles_reports_broken_references() {
    let report = stdout_json(
        cartograph()
            .arg("cycles")
            .arg(fixtures().join("broken-ref.yaml"))
            .args(["--format", "json"]),
    );
    assert_eq!(report["checked"], 1);
    assert_eq!(report["failed"][0]["code"], "E3004");
    assert_eq!(report["failed"][0]["reference"], "#/components/responses/Missing");
}

// ---------------------------------------------------------------------------
// logging
// ---------------------------------------------------------------------------

#[test]
fn json_logs_go_to_stderr() {
    let output = cartograph()
        .args(["--log-level", "info", "--log-format", "json", "inspect"])
        .arg(fixtures().join("petstore.yaml"))
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout = String::from_utf8(output.stdout).expect("utf-8");
    let stderr = String::from_utf8(output.stderr).expect("utf-8");
    assert!(stdout.contains("title:"));
    assert!(!stdout.contains("spec_loaded"));

    let event = stderr
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|line| line["event"] == "spec_loaded")
        .expect("spec_loaded event on stderr");
    assert_eq!(event["level"], "INFO");
}

#[test]
fn log_level_from_environment() {
    cartograph()
        .env("CARTOGRAPH_LOG_LEVEL", "debug")
        .env("CARTOGRAPH_LOG_FORMAT", "json")
        .arg("resolve")
        .arg(fixtures().join("petstore.yaml"))
        .arg("#/components/schemas/Owner")
        .assert()
        .success()
        .stderr(contains("reference_resolved"));
}

//! Integration tests for the `jsontree` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise every subcommand
//! through the actual binary, including stdin/stdout piping, file I/O and
//! error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the config.json fixture.
fn config_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/config.json")
}

fn jsontree() -> Command {
    Command::cargo_bin("jsontree").unwrap()
}

/// Helper: a per-test scratch file path in the system temp directory.
fn scratch(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("jsontree-test-{}-{name}", std::process::id()))
}

// ─────────────────────────────────────────────────────────────────────────────
// fmt
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fmt_stdin_to_canonical() {
    jsontree()
        .arg("fmt")
        .write_stdin(r#"{ "a" : 1, "b" : [ true , null ] }"#)
        .assert()
        .success()
        .stdout("{\"a\":1,\"b\":[true,null]}\n");
}

#[test]
fn fmt_with_indent() {
    jsontree()
        .args(["fmt", "--indent", "2"])
        .write_stdin(r#"{"a":1,"b":2}"#)
        .assert()
        .success()
        .stdout("{\n  \"a\":1,\n  \"b\":2\n}\n");
}

#[test]
fn fmt_file_to_file() {
    let output = scratch("fmt.json");
    let _ = std::fs::remove_file(&output);

    jsontree()
        .args(["fmt", "-i", config_path(), "-o"])
        .arg(&output)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output).expect("output file must exist");
    assert!(content.starts_with(r#"{"server":{"host":"localhost","port":8080,"tls":null}"#));
    let _ = std::fs::remove_file(&output);
}

#[test]
fn fmt_invalid_json_reports_position() {
    jsontree()
        .arg("fmt")
        .write_stdin(r#"{"a":}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON"))
        .stderr(predicate::str::contains("position 5"));
}

#[test]
fn max_depth_is_configurable() {
    jsontree()
        .args(["fmt", "--max-depth", "1"])
        .write_stdin("[[1]]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nesting exceeds 1 levels"));

    jsontree()
        .args(["fmt", "--max-depth", "0"])
        .write_stdin("[[1]]")
        .assert()
        .success()
        .stdout("[[1]]\n");
}

#[test]
fn missing_input_file_fails() {
    jsontree()
        .args(["fmt", "-i", "/nonexistent/jsontree/input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// get
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn get_scalar_prints_text() {
    jsontree()
        .args(["get", "server.host", "-i", config_path()])
        .assert()
        .success()
        .stdout("localhost\n");

    jsontree()
        .args(["get", "limits.rps", "-i", config_path()])
        .assert()
        .success()
        .stdout("12.5\n");
}

#[test]
fn get_flat_dotted_key() {
    jsontree()
        .args(["get", "legacy.flag", "-i", config_path()])
        .assert()
        .success()
        .stdout("yes\n");
}

#[test]
fn get_container_prints_json() {
    jsontree()
        .args(["get", "paths", "-i", config_path()])
        .assert()
        .success()
        .stdout("[\"/api\",\"/health\"]\n");
}

#[test]
fn get_missing_path_exits_non_zero() {
    jsontree()
        .args(["get", "server.nothing", "-i", config_path()])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// flatten / collapse / dump
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn flatten_joins_keys() {
    jsontree()
        .arg("flatten")
        .write_stdin(r#"{"a":{"b":{"c":1}},"d":[{"e":2}]}"#)
        .assert()
        .success()
        .stdout("{\"a.b.c\":1,\"d\":[{\"e\":2}]}\n");
}

#[test]
fn collapse_prunes_nulls() {
    jsontree()
        .args(["collapse", "-i", config_path()])
        .assert()
        .success()
        .stdout(
            "{\"server\":{\"host\":\"localhost\",\"port\":8080},\"paths\":[\"/api\",\"/health\"],\"limits\":{\"rps\":12.5},\"legacy.flag\":\"yes\"}\n",
        );
}

#[test]
fn collapse_all_null_document() {
    jsontree()
        .arg("collapse")
        .write_stdin(r#"{"a":null,"b":{"c":null}}"#)
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn dump_lists_leaves() {
    jsontree()
        .args(["dump", "-i", config_path()])
        .assert()
        .success()
        .stdout(
            "server.host=localhost\nserver.port=8080\npaths.0=/api\npaths.1=/health\nlimits.rps=12.5\nlegacy.flag=yes\n",
        );
}

#[test]
fn no_subcommand_shows_usage() {
    jsontree()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

//! Integration tests for the `msproj` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise every subcommand
//! through the actual binary, including stdin/stdout piping, project files in
//! a scratch directory, and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use metrics_project::project_from_str;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// A per-test scratch path, removed before use.
fn scratch(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("msproj-test-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_file(&path);
    path
}

/// Copy a fixture into scratch space so the test can modify it.
fn scratch_copy(fixture_name: &str, name: &str) -> PathBuf {
    let path = scratch(name);
    std::fs::copy(fixture(fixture_name), &path).expect("fixture must exist");
    path
}

fn msproj() -> Command {
    Command::cargo_bin("msproj").unwrap()
}

fn read_project(path: &Path) -> metrics_project::ProjectRecord {
    let text = std::fs::read_to_string(path).expect("project file must exist");
    project_from_str(&text).expect("project file must load")
}

// ─────────────────────────────────────────────────────────────────────────────
// new
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn new_appends_extension_and_writes_defaults() {
    let base = scratch("new-defaults");
    let expected = base.with_extension("ms");
    let _ = std::fs::remove_file(&expected);

    msproj()
        .arg("new")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let content = std::fs::read_to_string(&expected).expect("new must create <name>.ms");
    assert_eq!(
        content,
        r#"{"projectName":"Untitled","creatorName":"Unknown","language":null,"fpState":null}"#
    );
    let _ = std::fs::remove_file(&expected);
}

#[test]
fn new_with_names_and_language() {
    let path = scratch("new-named.ms");

    msproj()
        .arg("new")
        .arg(&path)
        .args(["--name", "Payroll", "--creator", "Ada", "--language", "Java"])
        .assert()
        .success();

    let project = read_project(&path);
    assert_eq!(project.project_name, "Payroll");
    assert_eq!(project.creator_name, "Ada");
    assert_eq!(project.language.as_deref(), Some("Java"));
    assert_eq!(project.fp_state, None);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn new_keeps_existing_extension() {
    let path = scratch("new-upper.MS");

    msproj().arg("new").arg(&path).assert().success();

    assert!(path.exists());
    let _ = std::fs::remove_file(&path);
}

// ─────────────────────────────────────────────────────────────────────────────
// show
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn show_recomputes_function_points() {
    // the fixture stores stale zero totals
    msproj()
        .arg("show")
        .arg(fixture("payroll.ms"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Project:  Payroll"))
        .stdout(predicate::str::contains("Creator:  Ada"))
        .stdout(predicate::str::contains("External Inputs"))
        .stdout(predicate::str::contains("Total count:     111"))
        .stdout(predicate::str::contains("VAF sum:         42"))
        .stdout(predicate::str::contains("Function points: 118.8"))
        // estimated from the displayed 118.8, not the raw 118.77
        .stdout(predicate::str::contains("6,296 LOC (53 LOC/FP)"));
}

#[test]
fn show_json_output() {
    let output = msproj()
        .args(["show", "--json"])
        .arg(fixture("payroll.ms"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["projectName"], "Payroll");
    assert_eq!(summary["functionPoints"]["totalWeighted"], 111);
    assert_eq!(summary["functionPoints"]["fpFormatted"], "118.8");
    assert_eq!(
        summary["functionPoints"]["categories"].as_array().unwrap().len(),
        5
    );
    assert_eq!(
        summary["functionPoints"]["categories"][3]["complexity"],
        "Complex"
    );
}

#[test]
fn show_hand_edited_file_uses_defaults() {
    msproj()
        .arg("show")
        .arg(fixture("legacy.ms"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Project:  Untitled"))
        .stdout(predicate::str::contains("Creator:  Grace"))
        .stdout(predicate::str::contains("Language: None"))
        .stdout(predicate::str::contains("Total count:     26"))
        .stdout(predicate::str::contains("Function points: 16.9"))
        .stdout(predicate::str::contains("select a language first"));
}

#[test]
fn show_placeholder_worksheet_language_falls_back_to_project() {
    let path = scratch("show-placeholder.ms");
    msproj()
        .arg("new")
        .arg(&path)
        .args(["--language", "Java"])
        .assert()
        .success();
    msproj()
        .arg("fp")
        .arg(&path)
        .args(["--counts", "10,5,3,2,1", "--language", "None"])
        .assert()
        .success();

    assert_eq!(
        read_project(&path).fp_state.unwrap().language.as_deref(),
        Some("None")
    );
    msproj()
        .arg("show")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(53 LOC/FP)"))
        .stdout(predicate::str::contains("select a language first").not());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn show_project_without_worksheet() {
    let path = scratch("show-empty.ms");
    msproj().arg("new").arg(&path).assert().success();

    msproj()
        .arg("show")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Function points: not computed"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn show_missing_file_fails() {
    msproj()
        .arg("show")
        .arg(scratch("does-not-exist.ms"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn show_non_object_root_fails() {
    msproj()
        .arg("show")
        .arg(fixture("not-a-project.ms"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("root value is not an object"));
}

#[test]
fn show_corrupt_file_fails_with_parse_error() {
    let path = scratch("corrupt.ms");
    std::fs::write(&path, r#"{"projectName":"P","fpState":{"counts":[1,2"#).unwrap();

    msproj()
        .arg("show")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load project"))
        .stderr(predicate::str::contains("unexpected end of input"));
    let _ = std::fs::remove_file(&path);
}

// ─────────────────────────────────────────────────────────────────────────────
// fp
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fp_computes_and_stores_worksheet() {
    let path = scratch("fp-store.ms");
    msproj()
        .arg("new")
        .arg(&path)
        .args(["--language", "Java"])
        .assert()
        .success();

    msproj()
        .arg("fp")
        .arg(&path)
        .args([
            "--counts",
            "10,5,3,2,1",
            "--complexities",
            "average,1,simple,2,AVERAGE",
            "--vaf",
            "3,3,3,3,3,3,3,3,3,3,3,3,3,3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Function points: 118.8"));

    let state = read_project(&path).fp_state.expect("fp state must be saved");
    assert_eq!(state.language.as_deref(), Some("Java"));
    assert_eq!(state.counts, [10, 5, 3, 2, 1]);
    assert_eq!(state.complexities, [1, 1, 0, 2, 1]);
    assert_eq!(state.total_weighted, 111);
    assert_eq!(state.vaf_sum, 42);
    assert_eq!(state.fp_formatted, "118.8");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn fp_keeps_stored_ratings_and_defaults_to_average() {
    let path = scratch_copy("payroll.ms", "fp-keep.ms");

    msproj()
        .arg("fp")
        .arg(&path)
        .args(["--counts", "10,5,3,2,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Function points: 111.3"));

    let state = read_project(&path).fp_state.unwrap();
    assert_eq!(state.complexities, [1; 5]);
    assert_eq!(state.vaf_values, [3; 14]);
    assert_eq!(state.total_weighted, 104);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn fp_rejects_wrong_number_of_counts() {
    let path = scratch_copy("payroll.ms", "fp-short.ms");

    msproj()
        .arg("fp")
        .arg(&path)
        .args(["--counts", "1,2,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected 5 comma-separated counts, got 3"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn fp_rejects_negative_count() {
    let path = scratch_copy("payroll.ms", "fp-negative.ms");

    msproj()
        .arg("fp")
        .arg(&path)
        .args(["--counts", "1,2,-3,4,5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn fp_rejects_out_of_range_rating() {
    let path = scratch_copy("payroll.ms", "fp-vaf.ms");

    msproj()
        .arg("fp")
        .arg(&path)
        .args(["--counts", "1,1,1,1,1", "--vaf", "0,0,0,0,0,0,0,0,0,0,0,0,0,6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 5"));

    // the file is untouched on failure
    assert_eq!(read_project(&path).fp_state.unwrap().counts, [10, 5, 3, 2, 1]);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn fp_rejects_unknown_complexity() {
    let path = scratch_copy("payroll.ms", "fp-cx.ms");

    msproj()
        .arg("fp")
        .arg(&path)
        .args(["--counts", "1,1,1,1,1", "--complexities", "1,1,1,1,huge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid complexity: 'huge'"));
    let _ = std::fs::remove_file(&path);
}

// ─────────────────────────────────────────────────────────────────────────────
// language
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn language_updates_project_and_worksheet() {
    let path = scratch_copy("payroll.ms", "lang.ms");

    msproj()
        .arg("language")
        .arg(&path)
        .arg("Python")
        .assert()
        .success();

    let project = read_project(&path);
    assert_eq!(project.language.as_deref(), Some("Python"));
    assert_eq!(
        project.fp_state.unwrap().language.as_deref(),
        Some("Python")
    );

    msproj()
        .arg("show")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(21 LOC/FP)"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn language_rejects_blank() {
    let path = scratch_copy("payroll.ms", "lang-blank.ms");

    msproj()
        .arg("language")
        .arg(&path)
        .arg("  ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be blank"));
    let _ = std::fs::remove_file(&path);
}

// ─────────────────────────────────────────────────────────────────────────────
// fmt
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fmt_stdin_to_stdout() {
    msproj()
        .arg("fmt")
        .write_stdin("{ \"b\" : [ 1 , 2.0 ] ,\n \"a\" : \"x\\ty\" }")
        .assert()
        .success()
        .stdout("{\"b\":[1,2.0],\"a\":\"x\\ty\"}\n");
}

#[test]
fn fmt_file_to_file() {
    let output = scratch("fmt-out.ms");

    msproj()
        .arg("fmt")
        .arg("-i")
        .arg(fixture("legacy.ms"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.starts_with(r#"{"projectName":"  ","creatorName":"Grace""#));
    assert!(content.contains(r#""counts":[4,2,2]"#));
    let _ = std::fs::remove_file(&output);
}

#[test]
fn fmt_invalid_input_fails() {
    msproj()
        .arg("fmt")
        .write_stdin(r#"{"a":tru}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse document"))
        .stderr(predicate::str::contains("invalid literal at offset 5"));
}

#[test]
fn fmt_rejects_trailing_garbage() {
    msproj()
        .arg("fmt")
        .write_stdin("{} {}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("trailing characters"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    msproj()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("fmt"));
}

#[test]
fn unknown_subcommand_fails() {
    msproj()
        .arg("explode")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}

#[test]
fn debug_logging_goes_to_stderr() {
    msproj()
        .env("RUST_LOG", "debug")
        .arg("show")
        .arg(fixture("legacy.ms"))
        .assert()
        .success()
        .stderr(predicate::str::contains("projectName"))
        .stdout(predicate::str::contains("Project:  Untitled"));
}

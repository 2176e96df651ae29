use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write test file");
}

#[test]
fn default_output_is_structural_form() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.yaml");
    write_file(&input, "foo: 1\nbar:\n - 2\n");

    cargo_bin_cmd!("yamlite")
        .arg(&input)
        .assert()
        .success()
        .stdout("{\n  'foo' : \"1\",\n  'bar' : [\"2\"]\n}\n");
}

#[test]
fn dump_yaml_flag() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.yaml");
    write_file(&input, "foo: 1\nbar:\n - 2\n - 3\n");

    cargo_bin_cmd!("yamlite")
        .arg("-d")
        .arg(&input)
        .assert()
        .success()
        .stdout("foo: 1\nbar:\n  - 2\n  - 3\n");
}

#[test]
fn reads_stdin_with_dash() {
    cargo_bin_cmd!("yamlite")
        .arg("-")
        .write_stdin("a: b\n")
        .assert()
        .success()
        .stdout("{'a' : \"b\"}\n");
}

#[test]
fn parse_error_exits_nonzero() {
    cargo_bin_cmd!("yamlite")
        .arg("-")
        .write_stdin("a: b\nc: d\na: f\n")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("duplicated key are forbidden"));
}

#[test]
fn missing_file_exits_nonzero() {
    cargo_bin_cmd!("yamlite")
        .arg("definitely-not-here.yaml")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("unable to load the file"));
}

#[test]
fn stats_flag_reports_timings() {
    cargo_bin_cmd!("yamlite")
        .arg("-n")
        .arg("-")
        .write_stdin("a: b\n")
        .assert()
        .success()
        .stdout(
            contains("Document")
                .and(contains("Load speed"))
                .and(contains("Emit YAML"))
                .and(contains("Emit Python")),
        );
}

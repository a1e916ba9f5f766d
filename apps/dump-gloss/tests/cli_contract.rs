// CLI contract for the dump-gloss binary.
//
// Usage errors exit non-zero, print usage on stdout and write nothing.
// Unsupported data and hard failures both leave a JSON report behind.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dump-gloss"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn two_arguments_print_usage_and_fail() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("report.json");

    bin()
        .arg("ELANData")
        .arg(&report)
        .assert()
        .failure()
        .stdout(predicate::str::contains("corpus-data input-file output-file report-file:"))
        .stdout(predicate::str::contains("\treport-file: Report file"));

    assert!(!report.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn help_token_anywhere_prints_usage() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("report.json");

    bin()
        .args(["ELANData", "in.eaf", "help"])
        .arg(&report)
        .assert()
        .failure()
        .stdout(predicate::str::contains("corpus-data: Format of the input-file"));

    bin()
        .args(["--help", "ELANData", "in.eaf", "null"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("input-file: Input file"));

    assert!(!report.exists());
}

#[test]
fn unsupported_data_type_exits_cleanly_with_report() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("report.json");

    bin()
        .arg("WRONG")
        .arg(dir.path().join("doc1.eaf"))
        .arg("null")
        .arg(&report)
        .assert()
        .success();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    let items = v.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["what"], "Unsupported data type WRONG");
    assert_eq!(items[0]["severity"], "CRITICAL");
}

#[test]
fn missing_input_fails_but_flushes_report() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("report.json");

    bin()
        .arg("ELANData")
        .arg(dir.path().join("does-not-exist.eaf"))
        .arg("null")
        .arg(&report)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does-not-exist.eaf"));

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    let items = v.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["severity"], "NOTE");
    assert_eq!(items[1]["severity"], "CRITICAL");
    assert!(items[1]["e"].is_string());
}

#[test]
fn dash_leading_values_are_not_flags() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("-report.json");

    bin()
        .current_dir(dir.path())
        .args(["-h", "-doc.eaf", "--", "-report.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(v[0]["what"], "Unsupported data type -h");
}

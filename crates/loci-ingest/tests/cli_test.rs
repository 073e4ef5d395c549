//! End-to-end tests for the loci-ingest binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE: &str = "#header
chr1\t100\t200\t0.5\tPDB1\tA\tfeatX\t10\t20
chr2\t300\t400\tNOTANUM\tPDB2\tB\tfeatY\t1\t2
chr3\t5\t6\t0.1\tPDB3\tC\tfeatZ\t3\t4
";

fn data_folder() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("3dts_loci_scores.sorted.tsv"), SAMPLE).unwrap();
    dir
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("loci-ingest").unwrap();
    cmd.env_remove("LOG_LEVEL").env_remove("LOG_OUTPUT");
    cmd
}

#[test]
fn test_parse_writes_json_lines_to_stdout() {
    let dir = data_folder();

    let output = cmd()
        .arg("parse")
        .arg("--data-folder")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let docs: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["_id"], "chr1:g.100_200");
    assert_eq!(docs[0]["3dts"]["chrom"], "1");
    assert_eq!(docs[1]["_id"], "chr3:g.5_6");
}

#[test]
fn test_parse_to_file_with_limit() {
    let dir = data_folder();
    let out = dir.path().join("records.jsonl");

    cmd()
        .arg("parse")
        .arg("--data-folder")
        .arg(dir.path())
        .arg("--output")
        .arg(&out)
        .arg("--limit")
        .arg("1")
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), 1);
    assert!(written.contains("chr1:g.100_200"));
}

#[test]
fn test_check_prints_summary() {
    let dir = data_folder();

    cmd()
        .arg("check")
        .arg("--data-folder")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"emitted\": 2"))
        .stdout(predicate::str::contains("\"type-coercion-failure\": 1"))
        .stdout(predicate::str::contains("\"comment-or-blank\": 1"));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .arg("check")
        .arg("--data-folder")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot find input file"));
}

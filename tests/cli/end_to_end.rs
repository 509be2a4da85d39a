//! End-to-end tests of the `runscan` binary
//!
//! Each test runs the built binary with its config directory pointed at a
//! scratch location so a user's own configuration never leaks in.

use crate::common::fixtures::{flat_run_ab, solid_run, RunFixture, FASTQ_RECORD};
use std::path::Path;
use std::process::{Command, Output};

fn runscan(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_runscan"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .output()
        .expect("run runscan binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_text_report_on_stdout() {
    let fixture = flat_run_ab();
    let run_dir = fixture.path().to_str().unwrap();
    let output = runscan(fixture.scratch(), &["--log-level", "off", run_dir]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let report = stdout(&output);
    assert!(report.contains("run_20240102_flat"));
    assert!(report.contains("Sample A - first sample"));
    assert!(report.contains("Sample B - second sample"));
    assert!(report.contains("No anomalies"));
    assert!(!report.contains('\x1b'));
}

#[test]
fn test_json_report_to_file() {
    let fixture = solid_run();
    let destination = fixture.scratch().join("report.json");
    let output = runscan(
        fixture.scratch(),
        &[
            "--log-level",
            "off",
            "--color",
            "--output",
            destination.to_str().unwrap(),
            fixture.path().to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let written = std::fs::read_to_string(&destination).unwrap();
    let document: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(document["run"]["layout"], "solid4@1");
    assert_eq!(document["summary"]["samples"], 2);
    assert_eq!(document["summary"]["anomalies"].as_array().unwrap().len(), 3);
}

#[test]
fn test_verify_exits_with_anomalies_status() {
    let fixture = flat_run_ab();
    fixture.file("C_R1.fastq", FASTQ_RECORD);
    let run_dir = fixture.path().to_str().unwrap();

    let output = runscan(fixture.scratch(), &["--log-level", "off", "-F", "csv", run_dir]);
    assert_eq!(output.status.code(), Some(0));

    let output = runscan(
        fixture.scratch(),
        &["--log-level", "off", "-F", "csv", "--verify", run_dir],
    );
    assert_eq!(output.status.code(), Some(5));
    assert!(stdout(&output)
        .lines()
        .any(|line| line.starts_with(",,sequence,") && line.ends_with(",C_R1.fastq")));
    assert!(stderr(&output).contains("has 1 anomalies"));
}

#[test]
fn test_missing_run_directory() {
    let fixture = RunFixture::new("present");
    let missing = fixture.scratch().join("run_20240101_gone");
    let output = runscan(
        fixture.scratch(),
        &["--log-level", "off", missing.to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_malformed_run_directory() {
    let fixture = RunFixture::new("run_20240101_empty");
    let output = runscan(
        fixture.scratch(),
        &["--log-level", "off", fixture.path().to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unwritable_output() {
    let fixture = flat_run_ab();
    let destination = fixture.scratch().join("missing").join("report.txt");
    let output = runscan(
        fixture.scratch(),
        &[
            "--log-level",
            "off",
            "-O",
            destination.to_str().unwrap(),
            fixture.path().to_str().unwrap(),
        ],
    );
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("Cannot write report"));
}

#[test]
fn test_usage_errors_exit_with_failure() {
    let fixture = RunFixture::new("run");
    let output = runscan(fixture.scratch(), &[]);
    assert_eq!(output.status.code(), Some(1));

    let output = runscan(
        fixture.scratch(),
        &["--format", "yaml", fixture.path().to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown report format 'yaml'"));

    let output = runscan(
        fixture.scratch(),
        &["--config-file", "/nonexistent/runscan.toml", "--list-layouts"],
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_list_layouts() {
    let fixture = RunFixture::new("run");
    let output = runscan(fixture.scratch(), &["--log-level", "off", "--list-layouts"]);
    assert_eq!(output.status.code(), Some(0));
    let listing = stdout(&output);
    assert!(listing.contains("solid4@1"));
    assert!(listing.contains("flat@1"));
}

#[test]
fn test_config_file_layout_replaces_builtin() {
    let fixture = RunFixture::new("run_20240105_custom");
    fixture
        .file("samples.csv", "Sample\nQ\n")
        .file("reads/Q.fq", FASTQ_RECORD);
    let config = fixture.scratch().join("custom.toml");
    std::fs::write(
        &config,
        r#"
log-level = "off"
format = "json"

[[layouts]]
name = "flat"
version = 3
sample-sheet = "samples.csv"
reads = [{ pattern = "reads/{sample}.fq" }]
"#,
    )
    .unwrap();

    let output = runscan(
        fixture.scratch(),
        &["-c", config.to_str().unwrap(), "--list-layouts"],
    );
    assert!(stdout(&output).contains("flat@3"));
    assert!(!stdout(&output).contains("flat@1"));

    let output = runscan(
        fixture.scratch(),
        &["-c", config.to_str().unwrap(), fixture.path().to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let document: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(document["run"]["layout"], "flat@3");
    assert_eq!(document["run"]["samples"][0]["name"], "Q");
}

#[cfg(unix)]
#[test]
fn test_filesystem_failure_mid_scan() {
    let fixture = RunFixture::new("run_20240107_dangling");
    fixture.file("SampleSheet.csv", "Sample\nA\n");
    std::os::unix::fs::symlink(
        fixture.scratch().join("vanished.fastq"),
        fixture.path().join("A_R1.fastq"),
    )
    .unwrap();

    let output = runscan(
        fixture.scratch(),
        &["--log-level", "off", fixture.path().to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("A_R1.fastq"));
}

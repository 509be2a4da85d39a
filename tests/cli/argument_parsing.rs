//! CLI argument parsing tests
//!
//! Tests for command-line parsing, conflicting flags and report format resolution.

use clap::Parser;
use runscan::app::cli::args::*;
use runscan::report::ReportFormat;
use std::path::PathBuf;

#[test]
fn test_run_dir_and_options() {
    let args = Args::try_parse_from([
        "runscan",
        "--layout",
        "solid4",
        "-F",
        "md",
        "--output",
        "report.md",
        "--verify",
        "runs/solid0127_20110412_FRAG",
    ])
    .unwrap();

    assert_eq!(args.run_dir, Some(PathBuf::from("runs/solid0127_20110412_FRAG")));
    assert_eq!(args.layout.as_deref(), Some("solid4"));
    assert_eq!(args.output, Some(PathBuf::from("report.md")));
    assert!(args.verify);
    assert_eq!(args.report_format().unwrap(), ReportFormat::Markdown);
}

#[test]
fn test_run_dir_required_unless_listing_layouts() {
    assert!(Args::try_parse_from(["runscan"]).is_err());

    let args = Args::try_parse_from(["runscan", "--list-layouts"]).unwrap();
    assert!(args.list_layouts);
    assert_eq!(args.run_dir, None);
    assert!(args.validate().is_ok());
}

#[test]
fn test_color_flags_conflict() {
    let args = Args::try_parse_from(["runscan", "--color", "run"]).unwrap();
    assert_eq!(args.color_choice(), Some(true));

    let args = Args::try_parse_from(["runscan", "--no-color", "run"]).unwrap();
    assert_eq!(args.color_choice(), Some(false));

    assert!(Args::try_parse_from(["runscan", "--color", "--no-color", "run"]).is_err());
}

#[test]
fn test_log_options() {
    let args = Args::try_parse_from([
        "runscan",
        "-l",
        "debug",
        "--log-format=json",
        "--log-file",
        "none",
        "run",
    ])
    .unwrap();
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("json"));
    assert_eq!(args.log_file_path(), None);

    assert!(Args::try_parse_from(["runscan", "--log-level", "loud", "run"]).is_err());
    assert!(Args::try_parse_from(["runscan", "--log-format", "xml", "run"]).is_err());
}

#[test]
fn test_format_inferred_from_output_extension() {
    let args = Args::try_parse_from(["runscan", "-O", "summary.TSV", "run"]).unwrap();
    assert_eq!(args.report_format().unwrap(), ReportFormat::Tsv);

    let args = Args::try_parse_from(["runscan", "-O", "summary.report", "run"]).unwrap();
    assert_eq!(args.report_format().unwrap(), ReportFormat::Text);

    let args = Args::try_parse_from(["runscan", "-O", "summary.csv", "-F", "json", "run"]).unwrap();
    assert_eq!(args.report_format().unwrap(), ReportFormat::Json);
}

#[test]
fn test_unknown_format_fails_validation() {
    let args = Args::try_parse_from(["runscan", "--format", "yaml", "run"]).unwrap();
    let err = args.validate().unwrap_err();
    assert!(err.to_string().contains("expected one of: text, markdown, json, csv, tsv"));
}

#[test]
fn test_empty_output_is_rejected() {
    assert!(Args::try_parse_from(["runscan", "--output", "", "run"]).is_err());

    // only reachable through `output = ""` in a config file
    let args = Args {
        run_dir: Some(PathBuf::from("run")),
        output: Some(PathBuf::new()),
        ..Args::default()
    };
    let err = args.validate().unwrap_err();
    assert!(err.to_string().contains("--output cannot be empty"));
}

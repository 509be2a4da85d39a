//! CLI TOML configuration tests
//!
//! Tests for configuration file loading, command-line overrides and
//! `[[layouts]]` profiles.

use crate::common::fixtures::RunFixture;
use clap::Parser;
use runscan::app::cli::args::*;
use runscan::scanner::LayoutRegistry;
use std::path::{Path, PathBuf};
use toml::Table;

const CONFIG: &str = r#"
format = "json"
output = "from-config.json"
verify = true
no-color = true
log-level = "warn"

[[layouts]]
name = "miseq"
description = "MiSeq output folder"
sample-sheet = "SampleSheet.csv"
reads = [{ pattern = "Data/Intensities/BaseCalls/{sample}_S*_R?_001.fastq.gz" }]
read-tag-pattern = '_(?P<tag>R[12])_'
"#;

#[test]
fn test_config_values_fill_unset_arguments() {
    let mut args = Args::try_parse_from(["runscan", "run"]).unwrap();
    let config: Table = toml::from_str(CONFIG).unwrap();
    Args::apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.format.as_deref(), Some("json"));
    assert_eq!(args.output, Some(PathBuf::from("from-config.json")));
    assert!(args.verify);
    assert_eq!(args.color_choice(), Some(false));
    assert_eq!(args.log_level.as_deref(), Some("warn"));
    assert_eq!(args.layouts.len(), 1);
    assert_eq!(args.layouts[0].name, "miseq");
    assert_eq!(args.layouts[0].version, 1);
}

#[test]
fn test_command_line_overrides_config() {
    let mut args = Args::try_parse_from([
        "runscan",
        "--format",
        "csv",
        "--color",
        "--log-level",
        "debug",
        "run",
    ])
    .unwrap();
    let config: Table = toml::from_str(CONFIG).unwrap();
    Args::apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.format.as_deref(), Some("csv"));
    assert_eq!(args.color_choice(), Some(true));
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    // unset on the command line, so still taken from the config
    assert!(args.verify);
}

#[test]
fn test_config_type_errors() {
    let mut args = Args::default();
    let mut config = Table::new();
    config.insert("verify".to_string(), toml::Value::String("yes".to_string()));
    let err = Args::apply_toml_values(&mut args, &config).unwrap_err();
    assert!(err.to_string().contains("'verify' must be true or false"));

    let mut config = Table::new();
    config.insert("format".to_string(), toml::Value::Integer(3));
    assert!(Args::apply_toml_values(&mut args, &config).is_err());
}

#[test]
fn test_invalid_layout_profile_is_reported_by_position() {
    let config: Table = toml::from_str(
        r#"
        [[layouts]]
        name = "ok"
        sample-sheet = "s.csv"
        reads = [{ pattern = "{sample}.fastq" }]

        [[layouts]]
        name = "broken"
        reeds = []
        "#,
    )
    .unwrap();
    let mut args = Args::default();
    let err = Args::apply_toml_values(&mut args, &config).unwrap_err();
    assert!(err.to_string().contains("Invalid layout profile #2"));
}

#[test]
fn test_parse_config_file_from_disk() {
    let fixture = RunFixture::new("run");
    let path = fixture.scratch().join("runscan.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let mut args = Args::try_parse_from(["runscan", "run"]).unwrap();
    let loaded = Args::parse_config_file(&mut args, Some(&path)).unwrap();
    assert_eq!(loaded.as_deref(), Some(path.as_path()));
    assert_eq!(args.format.as_deref(), Some("json"));

    let registry = LayoutRegistry::with_configured(args.layouts.clone()).unwrap();
    assert_eq!(registry.names(), vec!["miseq", "solid4", "flat"]);
}

#[test]
fn test_missing_explicit_config_file() {
    let mut args = Args::default();
    let err = Args::parse_config_file(&mut args, Some(Path::new("/nonexistent/runscan.toml")))
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_malformed_config_file() {
    let fixture = RunFixture::new("run");
    let path = fixture.scratch().join("runscan.toml");
    std::fs::write(&path, "format = [unterminated").unwrap();

    let mut args = Args::default();
    let err = Args::parse_config_file(&mut args, Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Error parsing configuration file"));
}

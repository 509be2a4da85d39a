//! Core CLI arguments structure and basic functionality
//!
//! Validation and configuration loading live in `validation` and `config`.

use crate::core::styles::palette_to_clap;
use crate::scanner::LayoutProfile;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Values of `--log-file` (or `log-file` in the config) that disable file logging
const LOG_FILE_DISABLED: [&str; 2] = ["none", "-"];

/// Accepted `--log-level` values, also enforced for `log-level` in the config
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Accepted `--log-format` values, also enforced for `log-format` in the config
pub const LOG_FORMATS: [&str; 3] = ["text", "ext", "json"];

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "runscan")]
#[command(about = "Sequencing run directory scanner and reporter")]
#[command(version)]
#[command(styles = palette_to_clap(true))]
pub struct Args {
    /// Run directory to scan
    #[arg(value_name = "RUN_DIR", required_unless_present = "list_layouts")]
    pub run_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Layout profile to use instead of auto-detection
    #[arg(short = 'L', long = "layout", value_name = "NAME")]
    pub layout: Option<String>,

    /// List registered layout profiles and exit
    #[arg(long = "list-layouts")]
    pub list_layouts: bool,

    /// Report format (text, markdown, json, csv, tsv)
    #[arg(short = 'F', long = "format", value_name = "FORMAT")]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short = 'O', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with status 5 when the report lists anomalies
    #[arg(long = "verify")]
    pub verify: bool,

    /// Force coloured output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = LOG_LEVELS)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = LOG_FORMATS)]
    pub log_format: Option<String>,

    /// Log file path
    #[arg(
        short = 'f',
        long = "log-file",
        value_name = "FILE",
        help = "Log file path (use 'none' to disable file logging)"
    )]
    pub log_file: Option<PathBuf>,

    /// Layout profiles loaded from `[[layouts]]` in the config file
    #[arg(skip)]
    pub layouts: Vec<LayoutProfile>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit colour choice: `Some(true)` for --color, `Some(false)` for --no-color
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Whether the report should carry colours. Reports written to a file
    /// never do; otherwise an explicit choice wins over terminal detection.
    pub fn use_colors(&self, stdout_is_terminal: bool) -> bool {
        self.output.is_none() && self.color_choice().unwrap_or(stdout_is_terminal)
    }

    /// Log file to write to, `None` when file logging is off
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file
            .as_deref()
            .filter(|p| !is_disabled_log_file(p))
    }
}

pub(crate) fn is_disabled_log_file(path: &Path) -> bool {
    path.to_str()
        .map(|s| LOG_FILE_DISABLED.iter().any(|d| s.eq_ignore_ascii_case(d)))
        .unwrap_or(false)
}

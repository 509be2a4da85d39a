//! Report formatter traits and format definitions

use crate::report::analysis::RunSummary;
use crate::report::error::ReportResult;
use crate::scanner::types::Run;
use std::path::Path;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Report output formats
#[derive(EnumIter, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ReportFormat {
    /// Human readable console report
    #[default]
    Text,
    /// Markdown tables
    Markdown,
    /// JSON document
    Json,
    /// CSV (Comma Separated Values), one row per read file
    Csv,
    /// TSV (Tab Separated Values), one row per read file
    Tsv,
}

impl ReportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Text => &["txt", "log", "out"],
            Self::Markdown => &["md", "mdown", "mkd"],
            Self::Json => &["jsn"],
            Self::Csv => &[],
            Self::Tsv => &["tab"],
        }
    }

    pub fn formats() -> impl Iterator<Item = ReportFormat> {
        ReportFormat::iter()
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        ReportFormat::iter().map(|fmt| fmt.name())
    }

    /// Parse a format name or alias, case-insensitive
    pub fn from_name(s: &str) -> Option<Self> {
        let lowercase = s.to_lowercase();
        let name = lowercase.as_str();
        Self::iter().find(|fmt| fmt.name() == name || fmt.aliases().contains(&name))
    }

    /// Detect the format from a file extension; `None` for unknown extensions
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }

    /// Only the text format knows how to use colours
    pub fn supports_color(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for report formatters
pub trait ReportFormatter {
    /// Render the run and its summary
    fn format(&self, run: &Run, summary: &RunSummary, use_colors: bool) -> ReportResult<String>;

    /// Get the format this formatter handles
    fn format_type(&self) -> ReportFormat;
}

//! Report formatting modules
//!
//! Each format is implemented in its own module; `get_formatter` picks one.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod text;

use crate::report::traits::{ReportFormat, ReportFormatter};
use unicode_width::UnicodeWidthStr;

/// Get formatter for the specified format
pub fn get_formatter(format: ReportFormat) -> Box<dyn ReportFormatter> {
    match format {
        ReportFormat::Text => Box::new(text::TextFormatter::new()),
        ReportFormat::Markdown => Box::new(markdown::MarkdownFormatter::new()),
        ReportFormat::Json => Box::new(json::JsonFormatter::new()),
        ReportFormat::Csv => Box::new(csv::CsvFormatter::new()),
        ReportFormat::Tsv => Box::new(csv::CsvFormatter::new_tsv()),
    }
}

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Human readable byte count, binary units
pub(crate) fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Left-align `text` to `width` display columns
pub(crate) fn pad(text: &str, width: usize) -> String {
    let shown = UnicodeWidthStr::width(text);
    if shown >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - shown))
    }
}

/// Widest display width among `items`
pub(crate) fn column_width<'a>(items: impl Iterator<Item = &'a str>) -> usize {
    items.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

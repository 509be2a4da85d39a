//! CSV/TSV report formatter
//!
//! One row per read file. Samples and libraries without files still get a
//! row with empty file columns; unassigned files come last with no sample.

use crate::report::analysis::RunSummary;
use crate::report::error::{ReportError, ReportResult};
use crate::report::traits::{ReportFormat, ReportFormatter};
use crate::scanner::types::{ReadFile, Run};

const HEADER: [&str; 6] = ["sample", "library", "kind", "tag", "size", "path"];

/// CSV formatter implementation
pub struct CsvFormatter {
    delimiter: u8,
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Create a TSV formatter
    pub fn new_tsv() -> Self {
        Self { delimiter: b'\t' }
    }

    fn record(sample: &str, library: &str, file: Option<&ReadFile>) -> Vec<String> {
        match file {
            Some(file) => vec![
                sample.to_string(),
                library.to_string(),
                file.kind().name().to_string(),
                file.tag().unwrap_or_default().to_string(),
                file.size().to_string(),
                file.path().display().to_string(),
            ],
            None => vec![
                sample.to_string(),
                library.to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
        }
    }

    fn records(run: &Run) -> Vec<Vec<String>> {
        let mut records = Vec::new();
        for sample in run.samples() {
            if sample.file_count() == 0 && sample.libraries().is_empty() {
                records.push(Self::record(sample.name(), "", None));
                continue;
            }
            for file in sample.sample_files() {
                records.push(Self::record(sample.name(), "", Some(file)));
            }
            for library in sample.libraries() {
                if library.files().is_empty() {
                    records.push(Self::record(sample.name(), library.name(), None));
                }
                for file in library.files() {
                    records.push(Self::record(sample.name(), library.name(), Some(file)));
                }
            }
        }
        for file in run.unassigned() {
            records.push(Self::record("", "", Some(file)));
        }
        records
    }

    fn format_error(&self, message: String) -> ReportError {
        ReportError::Format {
            format: self.format_type().to_string(),
            message,
        }
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for CsvFormatter {
    fn format(&self, run: &Run, _summary: &RunSummary, _use_colors: bool) -> ReportResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer
            .write_record(HEADER)
            .map_err(|e| self.format_error(e.to_string()))?;
        for record in Self::records(run) {
            writer
                .write_record(&record)
                .map_err(|e| self.format_error(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| self.format_error(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| self.format_error(e.to_string()))
    }

    fn format_type(&self) -> ReportFormat {
        if self.delimiter == b'\t' {
            ReportFormat::Tsv
        } else {
            ReportFormat::Csv
        }
    }
}

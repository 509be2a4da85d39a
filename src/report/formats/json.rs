//! JSON report formatter

use crate::report::analysis::RunSummary;
use crate::report::error::{ReportError, ReportResult};
use crate::report::traits::{ReportFormat, ReportFormatter};
use crate::scanner::types::Run;
use serde::Serialize;

/// JSON formatter implementation: a pretty-printed `{run, summary}` document
pub struct JsonFormatter;

#[derive(Serialize)]
struct Document<'a> {
    run: &'a Run,
    summary: &'a RunSummary,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, run: &Run, summary: &RunSummary, _use_colors: bool) -> ReportResult<String> {
        let document = Document { run, summary };
        serde_json::to_string_pretty(&document)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| ReportError::Format {
                format: self.format_type().to_string(),
                message: e.to_string(),
            })
    }

    fn format_type(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

//! Markdown report formatter

use super::format_bytes;
use crate::report::analysis::RunSummary;
use crate::report::error::ReportResult;
use crate::report::traits::{ReportFormat, ReportFormatter};
use crate::scanner::types::{ReadFile, Run, Sample};

/// Markdown formatter implementation
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escape characters with inline meaning in Markdown text and table cells
    fn escape_markdown(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\\' | '`' | '*' | '_' | '[' | ']' | '#' | '|' | '<' | '>' => format!("\\{}", c),
                _ => c.to_string(),
            })
            .collect()
    }

    /// Paths go in code spans; only a backtick would need care
    fn code(text: &str) -> String {
        if text.contains('`') {
            format!("`` {} ``", text)
        } else {
            format!("`{}`", text)
        }
    }

    fn overview(&self, run: &Run, summary: &RunSummary) -> String {
        let mut markdown = format!("# Run {}\n\n", Self::escape_markdown(run.name()));
        markdown.push_str("| Key | Value |\n| --- | --- |\n");

        let mut row = |key: &str, value: String| {
            markdown.push_str(&format!("| {} | {} |\n", Self::escape_markdown(key), value));
        };
        row("Layout", Self::code(run.layout()));
        row("Root", Self::code(&run.root().display().to_string()));
        row(
            "Sample sheet",
            run.sample_sheet()
                .map(|p| Self::code(&p.display().to_string()))
                .unwrap_or_else(|| "*inferred from file names*".to_string()),
        );
        let metadata = run.metadata();
        if let Some(instrument) = metadata.instrument() {
            row("Instrument", Self::escape_markdown(instrument));
        }
        if let Some(date) = metadata.date() {
            row("Date", date.format("%Y-%m-%d").to_string());
        }
        for (key, value) in metadata.fields() {
            row(key, Self::escape_markdown(value));
        }
        row("Samples", summary.samples.to_string());
        row("Libraries", summary.libraries.to_string());
        row("Read files", summary.files.to_string());
        row("Size", format_bytes(summary.bytes));
        markdown.push('\n');
        markdown
    }

    fn sample_section(&self, sample: &Sample, summary: &RunSummary) -> String {
        let mut markdown = format!("## Sample {}\n\n", Self::escape_markdown(sample.name()));

        if let Some(description) = sample.description() {
            markdown.push_str(&format!("{}\n\n", Self::escape_markdown(description)));
        }
        if sample.expected_empty() {
            markdown.push_str("*Marked empty in the sample sheet.*\n\n");
        }
        if let Some(figures) = summary.sample(sample.name()) {
            if figures.paired_end {
                markdown.push_str(&format!(
                    "Paired-end: {}\n\n",
                    figures.tags.join(", ")
                ));
            }
        }

        if sample.file_count() == 0 && sample.libraries().is_empty() {
            markdown.push_str("*No read files*\n\n");
            return markdown;
        }

        markdown.push_str("| Library | Barcodes | Kind | Tag | Size | Path |\n");
        markdown.push_str("| --- | --- | --- | --- | ---: | --- |\n");
        for file in sample.sample_files() {
            markdown.push_str(&Self::file_row("", "", Some(file)));
        }
        for library in sample.libraries() {
            let name = Self::escape_markdown(library.name());
            let barcodes = Self::escape_markdown(&library.barcodes().join(", "));
            if library.files().is_empty() {
                markdown.push_str(&Self::file_row(&name, &barcodes, None));
            }
            for file in library.files() {
                markdown.push_str(&Self::file_row(&name, &barcodes, Some(file)));
            }
        }
        markdown.push('\n');
        markdown
    }

    fn file_row(library: &str, barcodes: &str, file: Option<&ReadFile>) -> String {
        match file {
            Some(file) => format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                library,
                barcodes,
                file.kind().name(),
                file.tag().map(Self::escape_markdown).unwrap_or_default(),
                file.size(),
                Self::code(&file.path().display().to_string())
            ),
            None => format!("| {} | {} | | | | *no files* |\n", library, barcodes),
        }
    }

    fn projects(&self, summary: &RunSummary) -> String {
        if summary.projects.is_empty() {
            return String::new();
        }
        let mut markdown = String::from("## Projects\n\n| Project | Libraries | Samples |\n| --- | --- | --- |\n");
        for project in &summary.projects {
            markdown.push_str(&format!(
                "| {} | {} | {} |\n",
                Self::escape_markdown(&project.stem),
                Self::escape_markdown(&project.libraries.join(", ")),
                Self::escape_markdown(&project.samples.join(", "))
            ));
        }
        markdown.push('\n');
        markdown
    }

    fn anomalies(&self, summary: &RunSummary) -> String {
        let mut markdown = String::from("## Anomalies\n\n");
        if summary.anomalies.is_empty() {
            markdown.push_str("None\n");
        }
        for anomaly in &summary.anomalies {
            markdown.push_str(&format!("- {}\n", Self::escape_markdown(&anomaly.to_string())));
        }
        markdown
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, run: &Run, summary: &RunSummary, _use_colors: bool) -> ReportResult<String> {
        let mut markdown = self.overview(run, summary);
        for sample in run.samples() {
            markdown.push_str(&self.sample_section(sample, summary));
        }
        markdown.push_str(&self.projects(summary));
        markdown.push_str(&self.anomalies(summary));
        Ok(markdown)
    }

    fn format_type(&self) -> ReportFormat {
        ReportFormat::Markdown
    }
}

//! Text/Console report formatter

use super::{column_width, format_bytes, pad};
use crate::core::styles::StyleRole;
use crate::report::analysis::RunSummary;
use crate::report::error::ReportResult;
use crate::report::traits::{ReportFormat, ReportFormatter};
use crate::scanner::types::{ReadFile, Run};

/// Text formatter for console output
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    fn header(&self, run: &Run, use_colors: bool) -> String {
        let mut entries: Vec<(String, String)> = vec![
            ("Run".to_string(), run.name().to_string()),
            ("Layout".to_string(), run.layout().to_string()),
            ("Root".to_string(), run.root().display().to_string()),
            (
                "Sample sheet".to_string(),
                run.sample_sheet()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(samples inferred from file names)".to_string()),
            ),
        ];
        let metadata = run.metadata();
        if let Some(instrument) = metadata.instrument() {
            entries.push(("Instrument".to_string(), instrument.to_string()));
        }
        if let Some(date) = metadata.date() {
            entries.push(("Date".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        for (key, value) in metadata.fields() {
            entries.push((key.clone(), value.clone()));
        }

        let width = column_width(entries.iter().map(|(k, _)| k.as_str()));
        let mut result = String::new();
        for (key, value) in &entries {
            result.push_str(&format!(
                "{}  {}\n",
                StyleRole::Key.paint(&pad(key, width), use_colors),
                StyleRole::Value.paint(value, use_colors)
            ));
        }
        result
    }

    fn totals(&self, summary: &RunSummary, use_colors: bool) -> String {
        let line = format!(
            "Samples: {}  Libraries: {}  Files: {}  Size: {}",
            summary.samples,
            summary.libraries,
            summary.files,
            format_bytes(summary.bytes)
        );
        format!("{}\n", StyleRole::Header.paint(&line, use_colors))
    }

    fn samples(&self, run: &Run, summary: &RunSummary, use_colors: bool) -> String {
        let all_files = run.samples().iter().flat_map(|s| s.files());
        let columns = FileColumns::measure(all_files);
        let mut result = String::new();

        for sample in run.samples() {
            let mut line = format!("Sample {}", StyleRole::Sample.paint(sample.name(), use_colors));
            if let Some(description) = sample.description() {
                line.push_str(&format!(" - {}", description));
            }
            if sample.expected_empty() {
                line.push_str(&format!(" {}", StyleRole::Dim.paint("[empty]", use_colors)));
            }
            if let Some(figures) = summary.sample(sample.name()) {
                if figures.paired_end {
                    line.push_str(&format!(" [paired-end: {}]", figures.tags.join(", ")));
                }
                line.push_str(&format!(
                    ": {} files, {}",
                    figures.files,
                    format_bytes(figures.bytes)
                ));
            }
            result.push_str(&line);
            result.push('\n');

            for file in sample.sample_files() {
                result.push_str(&columns.line(file, "  ", use_colors));
            }

            for library in sample.libraries() {
                let mut line = format!(
                    "  Library {}",
                    StyleRole::Library.paint(library.name(), use_colors)
                );
                if !library.barcodes().is_empty() {
                    line.push_str(&format!(" (barcodes {})", library.barcodes().join(", ")));
                }
                if library.files().is_empty() {
                    line.push_str(": no files");
                } else {
                    let bytes: u64 = library.files().iter().map(|f| f.size()).sum();
                    line.push_str(&format!(
                        ": {} files, {}",
                        library.files().len(),
                        format_bytes(bytes)
                    ));
                }
                result.push_str(&line);
                result.push('\n');
                for file in library.files() {
                    result.push_str(&columns.line(file, "    ", use_colors));
                }
            }
        }
        result
    }

    fn projects(&self, summary: &RunSummary, use_colors: bool) -> String {
        if summary.projects.is_empty() {
            return String::new();
        }
        let width = column_width(summary.projects.iter().map(|p| p.stem.as_str()));
        let mut result = format!("\n{}\n", StyleRole::Header.paint("Projects", use_colors));
        for project in &summary.projects {
            result.push_str(&format!(
                "  {}  libraries {}; samples {}\n",
                StyleRole::Library.paint(&pad(&project.stem, width), use_colors),
                project.libraries.join(", "),
                project.samples.join(", ")
            ));
        }
        result
    }

    fn anomalies(&self, summary: &RunSummary, use_colors: bool) -> String {
        if summary.anomalies.is_empty() {
            return format!("\n{}\n", StyleRole::Valid.paint("No anomalies", use_colors));
        }
        let mut result = format!(
            "\n{}\n",
            StyleRole::Warning.paint(
                &format!("Anomalies ({})", summary.anomalies.len()),
                use_colors
            )
        );
        for anomaly in &summary.anomalies {
            result.push_str(&format!("  - {}\n", anomaly));
        }
        result
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Column widths for read file lines, shared across the whole report
struct FileColumns {
    kind: usize,
    tag: usize,
    size: usize,
}

impl FileColumns {
    fn measure<'a>(files: impl Iterator<Item = &'a ReadFile>) -> Self {
        let mut columns = Self {
            kind: 0,
            tag: 0,
            size: 0,
        };
        for file in files {
            columns.kind = columns.kind.max(file.kind().name().len());
            columns.tag = columns.tag.max(file.tag().map(column_width_of).unwrap_or(1));
            columns.size = columns.size.max(format_bytes(file.size()).len());
        }
        columns
    }

    fn line(&self, file: &ReadFile, indent: &str, use_colors: bool) -> String {
        let size = format_bytes(file.size());
        format!(
            "{}{}  {}  {}{}  {}\n",
            indent,
            pad(file.kind().name(), self.kind),
            pad(file.tag().unwrap_or("-"), self.tag),
            " ".repeat(self.size.saturating_sub(size.len())),
            size,
            StyleRole::Dim.paint(&file.path().display().to_string(), use_colors)
        )
    }
}

fn column_width_of(text: &str) -> usize {
    column_width(std::iter::once(text))
}

impl ReportFormatter for TextFormatter {
    fn format(&self, run: &Run, summary: &RunSummary, use_colors: bool) -> ReportResult<String> {
        let mut output = self.header(run, use_colors);
        output.push('\n');
        output.push_str(&self.totals(summary, use_colors));
        output.push('\n');
        output.push_str(&self.samples(run, summary, use_colors));
        output.push_str(&self.projects(summary, use_colors));
        output.push_str(&self.anomalies(summary, use_colors));
        Ok(output)
    }

    fn format_type(&self) -> ReportFormat {
        ReportFormat::Text
    }
}

//! Top-level application flow
//!
//! Everything between "arguments are parsed" and "process exits": build the
//! layout registry, scan, summarise, render and write. Standard output is
//! passed in so the whole flow runs in tests without a process.

use crate::app::cli::Args;
use crate::app::AppError;
use crate::core::styles::StyleRole;
use crate::report::{self, OutputDestination, ReportWriter, RunSummary};
use crate::scanner::layout::CompiledLayout;
use crate::scanner::{LayoutRegistry, RunScanner};
use std::io::Write;

/// Run one invocation against `stdout`.
///
/// With `--verify`, the report is still written before anomalies turn into
/// `AppError::AnomaliesFound`.
pub fn run(args: &Args, stdout: &mut dyn Write, stdout_is_terminal: bool) -> Result<(), AppError> {
    args.validate()?;
    let registry = LayoutRegistry::with_configured(args.layouts.clone())?;

    if args.list_layouts {
        let listing = list_layouts(&registry, args.use_colors(stdout_is_terminal));
        ReportWriter::new(OutputDestination::Stdout).write(&listing, stdout)?;
        return Ok(());
    }

    let run_dir = args
        .run_dir
        .as_deref()
        .ok_or_else(|| crate::core::validation::ValidationError::new("A run directory is required"))?;
    let format = args.report_format()?;

    let mut scanner = RunScanner::new(registry);
    if let Some(layout) = &args.layout {
        scanner = scanner.with_layout(layout.as_str());
    }
    let run = scanner.scan(run_dir)?;

    let summary = RunSummary::from_run(&run);
    for anomaly in &summary.anomalies {
        log::info!("Anomaly: {}", anomaly);
    }

    let content = report::render(&run, &summary, format, args.use_colors(stdout_is_terminal))?;
    ReportWriter::new(OutputDestination::from(args.output.as_deref())).write(&content, stdout)?;

    if args.verify && summary.has_anomalies() {
        return Err(AppError::AnomaliesFound {
            run: run.name().to_string(),
            count: summary.anomalies.len(),
        });
    }
    Ok(())
}

/// Human readable listing of the registered layout profiles
pub fn list_layouts(registry: &LayoutRegistry, use_colors: bool) -> String {
    let mut listing = String::new();
    for layout in registry.layouts() {
        listing.push_str(&describe_layout(layout, use_colors));
    }
    listing
}

fn describe_layout(layout: &CompiledLayout, use_colors: bool) -> String {
    let profile = layout.profile();
    let mut text = StyleRole::Header.paint(&layout.id(), use_colors);
    if !profile.description.is_empty() {
        text.push_str(&format!("  {}", profile.description));
    }
    text.push('\n');

    let sheet = match &profile.sample_sheet {
        Some(glob) => format!(
            "{} (delimiter {:?}, sample column '{}')",
            StyleRole::Literal.paint(glob, use_colors),
            profile.sheet.delimiter,
            profile.sheet.sample_column
        ),
        None => "none".to_string(),
    };
    text.push_str(&format!("  sample sheet: {}\n", sheet));

    if let Some(pattern) = &profile.run_name_pattern {
        text.push_str(&format!(
            "  run name:     {}\n",
            StyleRole::Literal.paint(pattern, use_colors)
        ));
    }
    for read in &profile.reads {
        text.push_str(&format!(
            "  reads:        {} ({})\n",
            StyleRole::Placeholder.paint(&read.pattern, use_colors),
            read.kind.name()
        ));
    }
    for exclude in &profile.exclude {
        text.push_str(&format!(
            "  exclude:      {}\n",
            StyleRole::Dim.paint(exclude, use_colors)
        ));
    }
    text
}

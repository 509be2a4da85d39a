//! Run reporter
//!
//! Turns a scanned `Run` into a `RunSummary` and renders both in one of the
//! `ReportFormat`s.

pub mod analysis;
pub mod error;
pub mod formats;
pub mod traits;
pub mod writer;

pub use analysis::{Anomaly, Project, RunSummary, SampleSummary};
pub use error::{ReportError, ReportResult};
pub use formats::get_formatter;
pub use traits::{ReportFormat, ReportFormatter};
pub use writer::{OutputDestination, ReportWriter};

use crate::scanner::types::Run;

/// Render a run in the given format; colours are dropped for formats that cannot carry them
pub fn render(
    run: &Run,
    summary: &RunSummary,
    format: ReportFormat,
    use_colors: bool,
) -> ReportResult<String> {
    get_formatter(format).format(run, summary, use_colors && format.supports_color())
}

//! Report destination handling

use crate::report::error::{ReportError, ReportResult};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where a report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    /// Write to the caller's standard output stream
    Stdout,
    /// Create or truncate a file
    File(PathBuf),
}

impl OutputDestination {
    /// Description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Stdout => "stdout".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

impl From<Option<&Path>> for OutputDestination {
    fn from(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Stdout,
        }
    }
}

/// Writes a rendered report to its destination
#[derive(Debug, Clone)]
pub struct ReportWriter {
    destination: OutputDestination,
}

impl ReportWriter {
    pub fn new(destination: OutputDestination) -> Self {
        Self { destination }
    }

    /// Write `content`; `stdout` is only used for `OutputDestination::Stdout`.
    /// The parent directory of a file destination must already exist.
    pub fn write(&self, content: &str, stdout: &mut dyn Write) -> ReportResult<()> {
        match &self.destination {
            OutputDestination::Stdout => {
                stdout
                    .write_all(content.as_bytes())
                    .and_then(|_| stdout.flush())
                    .map_err(|e| self.write_error(e))?;
            }
            OutputDestination::File(path) => {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|e| self.write_error(e))?;
                let mut writer = BufWriter::new(file);
                writer
                    .write_all(content.as_bytes())
                    .and_then(|_| writer.flush())
                    .map_err(|e| self.write_error(e))?;
                log::info!("Report written to {}", path.display());
            }
        }
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> ReportError {
        ReportError::Write {
            destination: self.destination.describe(),
            source,
        }
    }
}

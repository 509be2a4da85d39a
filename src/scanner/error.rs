//! Scanner Error Types

use std::path::PathBuf;

/// Scanner error types
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The run directory does not exist
    #[error("Run directory not found: {}", .path.display())]
    RunNotFound { path: PathBuf },

    /// The path exists but does not look like a run
    #[error("Malformed run at {}: {reason}", .path.display())]
    MalformedRun { path: PathBuf, reason: String },

    /// Filesystem failure part-way through a scan
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid layout profile or layout selection
    #[error("Layout configuration error: {message}")]
    Configuration { message: String },
}

impl ScanError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedRun {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ScanError::Io { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ScanError::MalformedRun { reason, .. } => Some(reason),
            ScanError::Configuration { message } => Some(message),
            ScanError::RunNotFound { .. } => Some("Run directory not found"),
            ScanError::Io { .. } => None,
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;

//! Report Error Types

/// Reporter error types
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The report destination could not be written
    #[error("Cannot write report to {destination}: {source}")]
    Write {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    /// A formatter failed to render the report
    #[error("Cannot format {format} report: {message}")]
    Format { format: String, message: String },
}

impl crate::core::error_handling::ContextualError for ReportError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, ReportError::Write { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ReportError::Write { .. } => Some("Cannot write report"),
            ReportError::Format { .. } => None,
        }
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

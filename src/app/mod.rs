//! Application layer: command line, configuration and top-level flow

pub mod cli;
pub mod runner;
pub mod startup;

use crate::core::error_handling::ContextualError;
use crate::core::validation::ValidationError;
use crate::report::ReportError;
use crate::scanner::ScanError;

/// Process exit statuses
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const RUN_NOT_FOUND: i32 = 2;
    pub const MALFORMED_RUN: i32 = 3;
    pub const WRITE_FAILURE: i32 = 4;
    pub const ANOMALIES: i32 = 5;
}

/// Every way a runscan invocation can fail
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// `--verify` was given and the report lists anomalies
    #[error("Run {run} has {count} anomalies")]
    AnomaliesFound { run: String, count: usize },
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) => exit_code::FAILURE,
            AppError::Scan(ScanError::RunNotFound { .. }) => exit_code::RUN_NOT_FOUND,
            AppError::Scan(ScanError::MalformedRun { .. }) => exit_code::MALFORMED_RUN,
            AppError::Scan(_) => exit_code::FAILURE,
            AppError::Report(ReportError::Write { .. }) => exit_code::WRITE_FAILURE,
            AppError::Report(_) => exit_code::FAILURE,
            AppError::AnomaliesFound { .. } => exit_code::ANOMALIES,
        }
    }

    /// Short description of the failing stage, used when logging
    pub fn context(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Argument validation",
            AppError::Scan(_) => "Run scan",
            AppError::Report(_) => "Report output",
            AppError::AnomaliesFound { .. } => "Run verification",
        }
    }
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Validation(e) => e.is_user_actionable(),
            AppError::Scan(e) => e.is_user_actionable(),
            AppError::Report(e) => e.is_user_actionable(),
            AppError::AnomaliesFound { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Validation(e) => e.user_message(),
            AppError::Scan(e) => e.user_message(),
            AppError::Report(e) => e.user_message(),
            AppError::AnomaliesFound { .. } => None,
        }
    }
}

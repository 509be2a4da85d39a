//! Generic error handling utilities
//!
//! Provides unified error handling that works across the scanner, reporter
//! and CLI error types while keeping a consistent logging pattern.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// User-actionable errors (a missing run directory, a malformed sample sheet,
/// a bad option) carry a message that is shown as-is. System errors (IO
/// failures) show the operation context, with the detail at debug level.
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`. When it returns `false`, `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error contains a specific, user-actionable message
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust,no_run
/// # use runscan::core::error_handling::log_error_with_context;
/// # use runscan::core::validation::ValidationError;
/// let err = ValidationError::new("Unknown layout 'hiseq'");
/// log_error_with_context(&err, "Layout selection");
/// // Logs: "FATAL: Unknown layout 'hiseq'"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

//! Validation utilities for arguments, configuration and layout profiles

use std::fmt;

/// Error raised when user-supplied arguments or configuration are inconsistent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    details: String,
}

impl ValidationError {
    pub fn new(details: &str) -> Self {
        Self {
            details: details.to_string(),
        }
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl std::error::Error for ValidationError {}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.details)
    }
}

/// Validate glob pattern syntax
pub fn validate_glob_pattern(pattern: &str) -> Result<String, String> {
    match glob::Pattern::new(pattern) {
        Ok(_) => Ok(pattern.to_string()),
        Err(e) => Err(format!("Invalid glob pattern '{}': {}", pattern, e)),
    }
}

/// Validate a regular expression and check it declares the named groups it must have
pub fn validate_regex(pattern: &str, required_groups: &[&str]) -> Result<regex::Regex, String> {
    let re = regex::Regex::new(pattern)
        .map_err(|e| format!("Invalid regular expression '{}': {}", pattern, e))?;
    for group in required_groups {
        if !re.capture_names().flatten().any(|name| name == *group) {
            return Err(format!(
                "Regular expression '{}' must contain a named group '{}'",
                pattern, group
            ));
        }
    }
    Ok(re)
}

/// Validate a delimiter string, which must be exactly one ASCII character
pub fn validate_delimiter(delimiter: &str) -> Result<u8, String> {
    let bytes = delimiter.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii() {
        return Err(format!(
            "Delimiter '{}' must be a single ASCII character",
            delimiter.escape_default()
        ));
    }
    Ok(bytes[0])
}
